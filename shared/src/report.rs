//! Plain-text collection reports.
//!
//! Reports are meant to be sent by e-mail; [`Report::mailto`] builds a
//! `mailto:` link carrying the subject and body.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::models::CollectionView;

const RULE: &str = "--------------------------------------------------";
const FOOTER: &str = "Relatório gerado pelo App de Coleta Preditiva.";

/// A report ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// E-mail subject line.
    pub subject: String,
    /// E-mail body.
    pub body: String,
}

impl Report {
    /// Builds a `mailto:` link with the percent-encoded subject and body.
    #[must_use]
    pub fn mailto(&self, recipient: Option<&str>) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            recipient.unwrap_or_default(),
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

fn format_timestamp(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y %H:%M").to_string()
}

fn format_day(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

fn readings(view: &CollectionView, indent: &str) -> String {
    let m = &view.collection.measurements;
    let mut text = format!(
        "Dados Coletados:\n{indent}- Vibração: {}\n{indent}- Temperatura: {} °C\n{indent}- Pressão: {} bar\n",
        m.vibration, m.temperature, m.pressure
    );
    if !view.collection.custom_values.is_empty() {
        let _ = writeln!(text, "\n{indent}Medições Específicas:");
        for (name, value) in &view.collection.custom_values {
            let _ = writeln!(text, "{indent}- {name}: {value}");
        }
    }
    text
}

/// Builds the report for a single collection.
#[must_use]
pub fn collection_report(view: &CollectionView) -> Report {
    let date = view.collection.date;
    let subject = format!(
        "Relatório de Manutenção Preditiva - {} / {} - {}",
        view.unit_name,
        view.equipment_name,
        format_day(date.date_naive())
    );

    let body = format!(
        "Relatório de Coleta de Dados de Manutenção Preditiva\n{RULE}\n\n\
         Equipamento: {} / {}\n\
         Colaborador: {}\n\
         Data da Coleta: {}\n\n\
         {}\n\
         Observações:\n{}\n\n\
         {RULE}\n{FOOTER}",
        view.unit_name,
        view.equipment_name,
        view.employee_name,
        format_timestamp(date),
        readings(view, ""),
        view.collection.notes,
    );

    Report { subject, body }
}

/// Builds the consolidated report for every collection taken on `day` (UTC).
///
/// Returns `None` when nothing was collected that day.
#[must_use]
pub fn daily_report(views: &[CollectionView], day: NaiveDate) -> Option<Report> {
    let todays: Vec<&CollectionView> = views
        .iter()
        .filter(|v| v.collection.date.date_naive() == day)
        .collect();

    if todays.is_empty() {
        return None;
    }

    let mut body = format!(
        "Relatório Consolidado de Coletas de Manutenção Preditiva\nData: {}\n{RULE}\n\n",
        format_day(day)
    );

    for (index, view) in todays.iter().enumerate() {
        let notes = if view.collection.notes.is_empty() {
            "Nenhuma"
        } else {
            view.collection.notes.as_str()
        };
        let _ = write!(
            body,
            "## COLETA {} ##\n\n\
             Equipamento: {} / {}\n\
             Colaborador: {}\n\
             Data da Coleta: {}\n\n\
             {}\n\
             Observações:\n{}\n{RULE}\n\n",
            index + 1,
            view.unit_name,
            view.equipment_name,
            view.employee_name,
            format_timestamp(view.collection.date),
            readings(view, "  ").trim_end(),
            notes,
        );
    }
    body.push_str(FOOTER);

    Some(Report {
        subject: format!("Relatório Diário de Coletas - {}", format_day(day)),
        body,
    })
}
