//! Shapes the visible collection for the card grid and the table.

use std::cmp::Ordering;

use crate::models::{Department, DepartmentId};

pub const CREATE_DEPARTMENT_ROUTE: &str = "/home/create-department";

pub const TABLE_COLUMNS: [&str; 8] = [
    "Name",
    "Country",
    "Location",
    "Owner",
    "Email",
    "Phone",
    "Categories",
    "Actions",
];

/// Number of text columns; the trailing "Actions" column carries the delete action.
pub const DATA_COLUMNS: usize = TABLE_COLUMNS.len() - 1;

/// Delete binding for one rendered record. `index` is its position in the
/// visible collection at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAction {
    pub id: DepartmentId,
    pub name: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentCard {
    pub name: String,
    pub country: String,
    pub location: String,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_mobile: String,
    pub tags: String,
    pub delete: Option<DeleteAction>,
}

/// One table row: identity, link target and display cells travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: DepartmentId,
    pub link: String,
    pub cells: [String; DATA_COLUMNS],
    pub delete: Option<DeleteAction>,
}

fn delete_action(department: &Department, index: usize, can_delete: bool) -> Option<DeleteAction> {
    can_delete.then(|| DeleteAction {
        id: department.id.clone(),
        name: department.department_name.clone(),
        index,
    })
}

pub fn cards(visible: &[Department], can_delete: bool) -> Vec<DepartmentCard> {
    visible
        .iter()
        .enumerate()
        .map(|(index, department)| DepartmentCard {
            name: department.department_name.clone(),
            country: department.country.clone(),
            location: department.location.clone(),
            owner_name: department.department_owner.name.clone(),
            owner_email: department.department_owner.email.clone(),
            owner_mobile: department.department_owner.mobile.clone(),
            tags: department.tags.clone(),
            delete: delete_action(department, index, can_delete),
        })
        .collect()
}

pub fn rows(visible: &[Department], can_delete: bool) -> Vec<TableRow> {
    visible
        .iter()
        .enumerate()
        .map(|(index, department)| {
            let owner = &department.department_owner;
            TableRow {
                id: department.id.clone(),
                link: format!("{}/{}", CREATE_DEPARTMENT_ROUTE, department.id),
                cells: [
                    department.department_name.clone(),
                    department.country.clone(),
                    department.location.clone(),
                    owner.name.clone(),
                    owner.email.clone(),
                    owner.mobile.clone(),
                    department.tags.clone(),
                ],
                delete: delete_action(department, index, can_delete),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: usize,
    pub direction: SortDirection,
}

impl TableSort {
    pub fn ascending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Same column flips direction; a new column starts ascending.
    pub fn toggle(current: Option<TableSort>, column: usize) -> TableSort {
        match current {
            Some(sort) if sort.column == column => TableSort {
                column,
                direction: match sort.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                },
            },
            _ => TableSort::ascending(column),
        }
    }
}

/// Stable, case-insensitive sort on one text column. Out of range columns
/// (including "Actions") leave the rows as they are.
pub fn sort_rows(rows: &mut [TableRow], sort: TableSort) {
    if sort.column >= DATA_COLUMNS {
        return;
    }
    rows.sort_by(|a, b| {
        let ordering = compare_ignore_case(&a.cells[sort.column], &b.cells[sort.column]);
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
