//! JSONL observation datasets and grid-table files.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use syllogism_core::model::{Conclusion, EncodingError, Syllogism};
use syllogism_models::{GridTables, Observation, Task};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?} line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path:?} line {line}: {source}")]
    Encoding {
        path: PathBuf,
        line: usize,
        #[source]
        source: EncodingError,
    },
    #[error("{path:?} line {line}: rating {rating} outside 1-6")]
    Rating {
        path: PathBuf,
        line: usize,
        rating: u8,
    },
    #[error("{path:?} contains no observations")]
    Empty { path: PathBuf },
    #[error("invalid grid tables in {path:?}: {source}")]
    GridTables {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParticipantId {
    Text(String),
    Number(i64),
}

impl ParticipantId {
    fn into_string(self) -> String {
        match self {
            ParticipantId::Text(text) => text,
            ParticipantId::Number(value) => value.to_string(),
        }
    }
}

/// One line of the dataset file.
#[derive(Debug, Deserialize)]
struct RawObservation {
    id: ParticipantId,
    enc_task: String,
    enc_resp: String,
    response: bool,
    rating: u8,
    is_believable: bool,
}

/// Observations of one participant, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: String,
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    participants: Vec<Participant>,
}

impl Dataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut participants: Vec<Participant> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (line_index, line) in BufReader::new(file).lines().enumerate() {
            let line_no = line_index + 1;
            let line = line.map_err(|source| DatasetError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let observation = parse_line(path, line_no, trimmed)?;
            let slot = *index
                .entry(observation.participant.clone())
                .or_insert_with(|| {
                    participants.push(Participant {
                        id: observation.participant.clone(),
                        observations: Vec::new(),
                    });
                    participants.len() - 1
                });
            participants[slot].observations.push(observation);
        }

        if participants.is_empty() {
            return Err(DatasetError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { participants })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn observation_count(&self) -> usize {
        self.participants.iter().map(|p| p.observations.len()).sum()
    }

    /// Observations of every participant except the one at `excluded`.
    pub fn others(&self, excluded: usize) -> Vec<Observation> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != excluded)
            .flat_map(|(_, p)| p.observations.iter().cloned())
            .collect()
    }
}

fn parse_line(path: &Path, line: usize, text: &str) -> Result<Observation, DatasetError> {
    let raw: RawObservation = serde_json::from_str(text).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        line,
        source,
    })?;
    let encoding = |source| DatasetError::Encoding {
        path: path.to_path_buf(),
        line,
        source,
    };
    let syllogism: Syllogism = raw.enc_task.parse().map_err(encoding)?;
    let conclusion: Conclusion = raw.enc_resp.parse().map_err(encoding)?;
    if !(1..=6).contains(&raw.rating) {
        return Err(DatasetError::Rating {
            path: path.to_path_buf(),
            line,
            rating: raw.rating,
        });
    }

    Ok(Observation {
        participant: raw.id.into_string(),
        task: Task::new(syllogism, conclusion, raw.is_believable),
        response: raw.response,
        rating: raw.rating,
    })
}

/// Load `{"shape": [...], "possible": [...], "necessary": [...]}`.
pub fn load_grid_tables(path: impl AsRef<Path>) -> Result<GridTables, DatasetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DatasetError::GridTables {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_lines(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        for line in lines {
            writeln!(file, "{line}").expect("write line");
        }
        file
    }

    #[test]
    fn groups_observations_by_participant_in_file_order() {
        let file = write_lines(&[
            r#"{"id": "p2", "enc_task": "AA1", "enc_resp": "Aac", "response": true, "rating": 6, "is_believable": true}"#,
            "",
            r#"{"id": 1, "enc_task": "EE1", "enc_resp": "Eca", "response": false, "rating": 2, "is_believable": false}"#,
            r#"{"id": "p2", "enc_task": "IA4", "enc_resp": "Ica", "response": true, "rating": 4, "is_believable": false}"#,
        ]);
        let dataset = Dataset::from_path(file.path()).expect("dataset loads");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.observation_count(), 3);
        assert_eq!(dataset.participants()[0].id, "p2");
        assert_eq!(dataset.participants()[0].observations.len(), 2);
        assert_eq!(dataset.participants()[1].id, "1");
        assert_eq!(dataset.others(0).len(), 1);
    }

    #[test]
    fn reports_line_of_bad_encoding() {
        let file = write_lines(&[
            r#"{"id": "p", "enc_task": "AA1", "enc_resp": "Aac", "response": true, "rating": 6, "is_believable": true}"#,
            r#"{"id": "p", "enc_task": "AA5", "enc_resp": "Aac", "response": true, "rating": 6, "is_believable": true}"#,
        ]);
        let err = Dataset::from_path(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Encoding { line: 2, .. }));
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let file = write_lines(&[
            r#"{"id": "p", "enc_task": "AA1", "enc_resp": "Aac", "response": true, "rating": 9, "is_believable": true}"#,
        ]);
        let err = Dataset::from_path(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Rating { line: 1, rating: 9, .. }));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_lines(&["", "   "]);
        assert!(matches!(
            Dataset::from_path(file.path()),
            Err(DatasetError::Empty { .. })
        ));
    }
}
