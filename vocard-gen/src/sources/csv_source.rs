//! CSV row source
//!
//! One header row, then one vocabulary entry per line. Rows are yielded as
//! keyed rows so column order in the file does not matter. The category
//! comes from, in order: the caller, a `category` column, the file stem
//! (`nouns.csv` → `noun`).

use super::{RowSourceError, SourceRow};
use crate::records::{normalize_name, Category, RawRow};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

const CATEGORY_COLUMN: &str = "category";

pub struct CsvRowSource<R: io::Read = File> {
    records: csv::StringRecordsIntoIter<R>,
    headers: Vec<String>,
    category_column: Option<usize>,
    default_category: Option<String>,
}

impl CsvRowSource<File> {
    /// Open a CSV file
    ///
    /// `category` overrides any `category` column and the file stem.
    pub fn open(path: &Path, category: Option<&str>) -> Result<Self, RowSourceError> {
        let from_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| Category::parse(stem).ok())
            .map(|c| c.as_str().to_string());

        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let source =
            Self::from_csv_reader(reader, category.map(str::to_string), from_stem)?;

        if source.category_column.is_none() && source.default_category.is_none() {
            return Err(RowSourceError::UnknownCategory(path.to_path_buf()));
        }

        debug!(
            path = %path.display(),
            category = ?source.default_category,
            columns = source.headers.len(),
            "Opened CSV source"
        );
        Ok(source)
    }
}

impl<R: io::Read> CsvRowSource<R> {
    /// Read CSV from any reader; rows without a category column get `category`
    pub fn from_reader(reader: R, category: Option<&str>) -> Result<Self, RowSourceError> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv_reader(reader, category.map(str::to_string), None)
    }

    /// `explicit` disables the category column; `fallback` covers rows without one
    fn from_csv_reader(
        mut reader: csv::Reader<R>,
        explicit: Option<String>,
        fallback: Option<String>,
    ) -> Result<Self, RowSourceError> {
        let headers: Vec<String> = reader.headers()?.iter().map(normalize_name).collect();
        let category_column = if explicit.is_some() {
            None
        } else {
            headers.iter().position(|h| h == CATEGORY_COLUMN)
        };
        let default_category = explicit.or(fallback);

        Ok(Self {
            records: reader.into_records(),
            headers,
            category_column,
            default_category,
        })
    }

    fn to_source_row(&self, record: &csv::StringRecord) -> SourceRow {
        let category = self
            .category_column
            .and_then(|i| record.get(i))
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_category.clone())
            .unwrap_or_default();

        let row = RawRow::keyed(
            self.headers
                .iter()
                .zip(record.iter())
                .filter(|(header, _)| !header.is_empty() && header.as_str() != CATEGORY_COLUMN)
                .map(|(header, value)| (header.as_str(), value)),
        );
        SourceRow { category, row }
    }
}

impl<R: io::Read> Iterator for CsvRowSource<R> {
    type Item = Result<SourceRow, RowSourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|r| self.to_source_row(&r))
                .map_err(RowSourceError::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_rows_with_explicit_category() {
        let data = "Noun,Article,English,Plural,Example\nHaus,das,house,Häuser,Das Haus ist groß.\n";
        let rows: Vec<_> = CsvRowSource::from_reader(data.as_bytes(), Some("noun"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "noun");
        assert_eq!(
            rows[0].row,
            RawRow::keyed([
                ("noun", "Haus"),
                ("article", "das"),
                ("english", "house"),
                ("plural", "Häuser"),
                ("example", "Das Haus ist groß."),
            ])
        );
    }

    #[test]
    fn test_category_column_per_row() {
        let data = "category,word,english,example\nadverb,hier,here,Ich bin hier.\nnegation,nie,never,Nie wieder.\n";
        let rows: Vec<_> = CsvRowSource::from_reader(data.as_bytes(), None)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows[0].category, "adverb");
        assert_eq!(rows[1].category, "negation");
        assert_eq!(
            rows[1].row,
            RawRow::keyed([("word", "nie"), ("english", "never"), ("example", "Nie wieder.")])
        );
    }

    #[test]
    fn test_short_row_leaves_columns_absent() {
        let data = "phrase,english,context\nGuten Tag,good day\n";
        let row = CsvRowSource::from_reader(data.as_bytes(), Some("phrase"))
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(
            row.row,
            RawRow::keyed([("phrase", "Guten Tag"), ("english", "good day")])
        );
    }
}
