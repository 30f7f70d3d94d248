//! CSV readers for food class and recipe rows.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{FoodClassRow, RecipeRow};

/// Column headers for both input files.
///
/// [`Default`] matches the headers of the reference data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumns {
    pub food_class_id: String,
    pub food_class_name: String,
    pub food_class_impact: String,
    pub food_class_parent_id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub ingredient_name: String,
    pub ingredient_weight: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            food_class_id: "ID".to_string(),
            food_class_name: "Name".to_string(),
            food_class_impact: "Impact / kg".to_string(),
            food_class_parent_id: "Parent ID".to_string(),
            recipe_id: "Recipe ID".to_string(),
            recipe_name: "Recipe Name".to_string(),
            ingredient_name: "Ingredient Name".to_string(),
            ingredient_weight: "Ingredient Weight / kg".to_string(),
        }
    }
}

/// Read food class rows from a CSV file.
///
/// Rules:
///
/// - CSV must have headers; columns may appear in any order.
/// - `Impact / kg` and `Parent ID` may be empty.
/// - `ID` and `Name` are required.
pub fn read_food_classes_from_path(
    path: impl AsRef<Path>,
    columns: &CsvColumns,
) -> IngestionResult<Vec<FoodClassRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_food_classes_from_reader(&mut rdr, columns)
}

/// Read food class rows from an existing CSV reader.
pub fn read_food_classes_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    columns: &CsvColumns,
) -> IngestionResult<Vec<FoodClassRow>> {
    let names = [
        &columns.food_class_id,
        &columns.food_class_name,
        &columns.food_class_impact,
        &columns.food_class_parent_id,
    ];
    let idx = column_indexes(rdr, names)?;

    let mut rows = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let row = row_idx0 + 2;
        let record = result?;
        let cell = |i: usize| Cell {
            row,
            column: names[i],
            raw: record.get(idx[i]).unwrap_or(""),
        };

        rows.push(FoodClassRow {
            id: cell(0).required()?.parse_i64()?,
            name: cell(1).required()?.raw.trim().to_owned(),
            impact_per_kg: cell(2).optional().map(Cell::parse_f64).transpose()?,
            parent_id: cell(3).optional().map(Cell::parse_i64).transpose()?,
        });
    }
    Ok(rows)
}

/// Read recipe rows from a CSV file. Each row is one (recipe, ingredient) pair.
///
/// The recipe id and weight are required and the weight must be a non-negative number. Blank
/// names are kept as empty text; a blank ingredient never matches a food class.
pub fn read_recipe_rows_from_path(
    path: impl AsRef<Path>,
    columns: &CsvColumns,
) -> IngestionResult<Vec<RecipeRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_recipe_rows_from_reader(&mut rdr, columns)
}

/// Read recipe rows from an existing CSV reader.
pub fn read_recipe_rows_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    columns: &CsvColumns,
) -> IngestionResult<Vec<RecipeRow>> {
    let names = [
        &columns.recipe_id,
        &columns.recipe_name,
        &columns.ingredient_name,
        &columns.ingredient_weight,
    ];
    let idx = column_indexes(rdr, names)?;

    let mut rows = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let row = row_idx0 + 2;
        let record = result?;
        let cell = |i: usize| Cell {
            row,
            column: names[i],
            raw: record.get(idx[i]).unwrap_or(""),
        };

        let weight_cell = cell(3).required()?;
        let weight = weight_cell.parse_f64()?;
        if !(weight >= 0.0) {
            return Err(weight_cell.error("weight must be a non-negative number".to_string()));
        }

        rows.push(RecipeRow {
            recipe_id: cell(0).required()?.parse_i64()?,
            recipe_name: cell(1).text(),
            ingredient_name: cell(2).text(),
            ingredient_weight_kg: weight,
        });
    }
    Ok(rows)
}

/// Map the wanted headers to CSV column indexes (allows re-ordered CSV columns).
fn column_indexes<R: std::io::Read, const N: usize>(
    rdr: &mut csv::Reader<R>,
    wanted: [&String; N],
) -> IngestionResult<[usize; N]> {
    let headers = rdr.headers()?.clone();
    let mut out = [0usize; N];
    for (slot, name) in out.iter_mut().zip(wanted) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name.as_str())
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!(
                    "missing required column '{name}'. headers={:?}",
                    headers.iter().collect::<Vec<_>>()
                ),
            })?;
    }
    Ok(out)
}

#[derive(Clone, Copy)]
struct Cell<'a> {
    row: usize,
    column: &'a str,
    raw: &'a str,
}

impl<'a> Cell<'a> {
    fn optional(self) -> Option<Self> {
        if self.raw.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }

    fn text(self) -> String {
        self.raw.trim().to_owned()
    }

    fn required(self) -> IngestionResult<Self> {
        self.optional()
            .ok_or_else(|| self.error("value is required".to_string()))
    }

    fn parse_i64(self) -> IngestionResult<i64> {
        self.raw
            .trim()
            .parse::<i64>()
            .map_err(|e| self.error(e.to_string()))
    }

    fn parse_f64(self) -> IngestionResult<f64> {
        self.raw
            .trim()
            .parse::<f64>()
            .map_err(|e| self.error(e.to_string()))
    }

    fn error(self, message: String) -> IngestionError {
        IngestionError::ParseError {
            row: self.row,
            column: self.column.to_owned(),
            raw: self.raw.to_owned(),
            message,
        }
    }
}
