use crate::deck::SummaryConfig;
use crate::domain::model::{StepReport, SummaryKey};
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One recorded row: the values of every configured vector at the end
/// of a report step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub elapsed_days: f64,
    pub values: Vec<f64>,
}

/// Recorded summary vectors for a run, one column per configured key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["DATE".to_string(), "DAYS".to_string()];
        header.extend(self.columns.iter().cloned());
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.date.to_string(), format!("{:.2}", row.elapsed_days)];
            record.extend(row.values.iter().map(|v| format!("{:.4}", v)));
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        let objects: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut object = serde_json::Map::new();
                object.insert("date".to_string(), serde_json::json!(row.date.to_string()));
                object.insert("days".to_string(), serde_json::json!(row.elapsed_days));
                for (column, value) in self.columns.iter().zip(&row.values) {
                    object.insert(column.clone(), serde_json::json!(value));
                }
                serde_json::Value::Object(object)
            })
            .collect();

        Ok(serde_json::to_vec_pretty(&objects)?)
    }
}

/// Evaluates the configured summary keys against each step report.
#[derive(Debug, Clone, Default)]
pub struct SummaryRecorder {
    keys: Vec<SummaryKey>,
    table: SummaryTable,
    cumulative_oil: f64,
}

impl SummaryRecorder {
    pub fn new(config: &SummaryConfig) -> Self {
        let keys = config.keys().to_vec();
        let columns = keys.iter().map(|k| k.label()).collect();
        SummaryRecorder {
            keys,
            table: SummaryTable {
                columns,
                rows: Vec::new(),
            },
            cumulative_oil: 0.0,
        }
    }

    pub fn record(&mut self, report: &StepReport) {
        self.cumulative_oil += report.field_oil_rate * report.length_days;

        let values = self
            .keys
            .iter()
            .map(|key| self.evaluate(key, report))
            .collect();

        self.table.rows.push(SummaryRow {
            date: report.date,
            elapsed_days: report.elapsed_days,
            values,
        });
    }

    fn evaluate(&self, key: &SummaryKey, report: &StepReport) -> f64 {
        match (key.mnemonic.as_str(), &key.well) {
            ("FOPR", None) => report.field_oil_rate,
            ("FOPT", None) => self.cumulative_oil,
            ("FWPR", None) => report.field_water_rate,
            ("FGIR", None) => report.field_gas_injection_rate,
            ("FPR", None) => report.average_pressure,
            ("WBHP", Some(well)) => self
                .well_report(report, well)
                .map(|w| w.bhp)
                .unwrap_or(0.0),
            ("WOPR", Some(well)) => self
                .well_report(report, well)
                .map(|w| w.rate)
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn well_report<'a>(
        &self,
        report: &'a StepReport,
        well: &str,
    ) -> Option<&'a crate::domain::model::WellReport> {
        report.wells.iter().find(|w| w.name == well)
    }

    pub fn take(&mut self) -> SummaryTable {
        std::mem::take(&mut self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::WellReport;

    fn report(step: usize, oil_rate: f64, pressure: f64) -> StepReport {
        StepReport {
            step,
            date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + chrono::Duration::days(step as i64),
            length_days: 1.0,
            elapsed_days: step as f64,
            average_pressure: pressure,
            field_oil_rate: oil_rate,
            field_water_rate: 0.0,
            field_gas_injection_rate: 0.0,
            wells: vec![WellReport {
                name: "PROD".to_string(),
                bhp: pressure - 100.0,
                rate: oil_rate,
                rate_limited: false,
            }],
        }
    }

    fn recorder_with(labels: &[(&str, Option<&str>)]) -> SummaryRecorder {
        let keys: Vec<SummaryKey> = labels
            .iter()
            .map(|(m, w)| match w {
                Some(w) => SummaryKey::well(m, w),
                None => SummaryKey::field(m),
            })
            .collect();
        let columns = keys.iter().map(|k| k.label()).collect();
        SummaryRecorder {
            keys,
            table: SummaryTable {
                columns,
                rows: Vec::new(),
            },
            cumulative_oil: 0.0,
        }
    }

    #[test]
    fn test_record_evaluates_keys() {
        let mut recorder = recorder_with(&[
            ("FOPR", None),
            ("FOPT", None),
            ("FPR", None),
            ("WBHP", Some("PROD")),
        ]);

        recorder.record(&report(1, 1000.0, 4500.0));
        recorder.record(&report(2, 900.0, 4490.0));

        let table = recorder.take();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].values, vec![1000.0, 1000.0, 4500.0, 4400.0]);
        assert_eq!(table.rows[1].values[1], 1900.0); // cumulative
    }

    #[test]
    fn test_csv_round_shape() {
        let mut recorder = recorder_with(&[("FOPR", None)]);
        recorder.record(&report(1, 1000.0, 4500.0));

        let csv_bytes = recorder.take().to_csv().unwrap();
        let text = String::from_utf8(csv_bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "DATE,DAYS,FOPR");
        assert!(lines.next().unwrap().starts_with("2015-01-02,1.00,1000.0000"));
    }

    #[test]
    fn test_json_objects_per_row() {
        let mut recorder = recorder_with(&[("FOPR", None), ("WBHP", Some("PROD"))]);
        recorder.record(&report(1, 1000.0, 4500.0));

        let json_bytes = recorder.take().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(parsed[0]["FOPR"], 1000.0);
        assert_eq!(parsed[0]["WBHP:PROD"], 4400.0);
    }
}
