//! Kanban view: applications grouped into the four pipeline columns.

use serde::Serialize;

use crate::models::application::{Application, ApplicationStatus};

#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub status: ApplicationStatus,
    pub count: usize,
    pub applications: Vec<Application>,
}

#[derive(Debug, Serialize)]
pub struct Board {
    pub total: usize,
    pub columns: Vec<BoardColumn>,
}

/// Groups applications by status. Every column is present, in pipeline
/// order, even when empty. Cards inside a column are newest first.
pub fn build_board(applications: Vec<Application>) -> Board {
    let total = applications.len();
    let mut columns: Vec<BoardColumn> = ApplicationStatus::ALL
        .iter()
        .map(|status| BoardColumn {
            status: *status,
            count: 0,
            applications: Vec::new(),
        })
        .collect();

    for application in applications {
        if let Some(column) = columns.iter_mut().find(|c| c.status == application.status) {
            column.applications.push(application);
        }
    }

    for column in &mut columns {
        column
            .applications
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
        column.count = column.applications.len();
    }

    Board { total, columns }
}
