use crate::domain::model::{Breadcrumb, ConsentRecord, ContentRecord, PrevNext, Ranked, Section};
use crate::utils::error::{Result, SiteError};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(SiteError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

/// CLI 各種清單共用的扁平輸出列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub position: String,
    pub kind: String,
    pub id: String,
    pub title: String,
    pub url: String,
    pub score: Option<f64>,
}

impl ReportRow {
    fn from_record(position: String, kind: &str, record: &ContentRecord, score: Option<f64>) -> Self {
        Self {
            position,
            kind: kind.to_string(),
            id: record.id.clone(),
            title: record.title.clone(),
            url: record.url.clone(),
            score,
        }
    }
}

pub fn ranked_rows(ranked: &[Ranked<'_>]) -> Vec<ReportRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, r)| ReportRow::from_record((i + 1).to_string(), r.kind(), r.record, Some(r.score)))
        .collect()
}

pub fn record_rows(section: Section, records: &[&ContentRecord]) -> Vec<ReportRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| ReportRow::from_record((i + 1).to_string(), section.kind(), r, None))
        .collect()
}

pub fn navigation_rows(nav: &PrevNext<'_>) -> Vec<ReportRow> {
    let kind = nav.section.unwrap_or(Section::Pages).kind();
    [("prev", nav.prev), ("next", nav.next)]
        .into_iter()
        .filter_map(|(position, record)| {
            record.map(|r| ReportRow::from_record(position.to_string(), kind, r, None))
        })
        .collect()
}

/// 麵包屑列：id 為原始路徑片段，home 的 id 為空
pub fn breadcrumb_rows(crumbs: &[Breadcrumb]) -> Vec<ReportRow> {
    crumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            let kind = if crumb.is_home {
                "home"
            } else if crumb.is_last {
                "current"
            } else {
                "crumb"
            };
            ReportRow {
                position: (i + 1).to_string(),
                kind: kind.to_string(),
                id: crumb.raw.clone(),
                title: crumb.label.clone(),
                url: crumb.url.clone(),
                score: None,
            }
        })
        .collect()
}

pub fn render_rows(rows: &[ReportRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            finish_csv(writer)
        }
    }
}

/// 同意狀態的輸出；CSV 在沒有紀錄時只輸出標題列
pub fn render_consent(record: Option<&ConsentRecord>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(match record {
            Some(record) => format!(
                "accepted={} timestamp={} version={}",
                record.accepted, record.timestamp, record.version
            ),
            None => "no consent choice recorded".to_string(),
        }),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&record)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["accepted", "timestamp", "version"])?;
            if let Some(record) = record {
                writer.write_record([
                    record.accepted.to_string().as_str(),
                    record.timestamp.as_str(),
                    record.version.as_str(),
                ])?;
            }
            finish_csv(writer)
        }
    }
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| SiteError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| SiteError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn render_text(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return "(none)".to_string();
    }
    rows.iter()
        .map(|row| match row.score {
            Some(score) => format!(
                "{:>4}  {:<8} {:.3}  {}  {}",
                row.position, row.kind, score, row.title, row.url
            ),
            None => format!("{:>4}  {:<8} {}  {}", row.position, row.kind, row.title, row.url),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
