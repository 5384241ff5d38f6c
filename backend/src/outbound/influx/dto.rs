//! DTOs for decoding InfluxDB `/query` responses.
//!
//! Only the parts the adapter inspects are typed; statement results are kept
//! as raw JSON for pass-through.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::MonitoredService;

#[derive(Debug, Deserialize)]
pub(super) struct QueryResponseDto {
    #[serde(default)]
    pub(super) results: Vec<Value>,
    pub(super) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatementDto {
    #[serde(default)]
    pub(super) series: Vec<SeriesDto>,
    pub(super) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SeriesDto {
    pub(super) name: String,
    #[serde(default)]
    pub(super) columns: Vec<String>,
    #[serde(default)]
    pub(super) values: Vec<Vec<Value>>,
}

impl SeriesDto {
    /// Rows of a `SHOW TAG VALUES` series as services named after the series.
    pub(super) fn into_services(self) -> Result<Vec<MonitoredService>, String> {
        let column = |wanted: &str| {
            self.columns
                .iter()
                .position(|name| name == wanted)
                .ok_or_else(|| format!("series {} has no {wanted} column", self.name))
        };
        let key_index = column("key")?;
        let value_index = column("value")?;

        self.values
            .iter()
            .map(|row| {
                let cell = |index: usize| {
                    row.get(index)
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                        .ok_or_else(|| format!("series {} has a malformed row", self.name))
                };
                Ok(MonitoredService {
                    tag_key: cell(key_index)?,
                    tag_value: cell(value_index)?,
                    kind: self.name.clone(),
                })
            })
            .collect()
    }
}
