//! School lunch menu selection.
//!
//! Each dish row of a menu table picks exactly one option in every
//! category (main-dish cooking, side-dish cooking, soup or dessert,
//! staple). For `n` rows and `m` option columns the decision variables are
//! `x[i][j]`, and
//!
//! ```text
//! H = sum_g P(g) * sum_i (sum_{j in g} x[i][j] - 1)^2
//!   - P(preference) * sum_i sum_j D[i][j] * x[i][j]
//! ```
//!
//! where `D` is the numeric part of the table.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{QuboError, Result};
use crate::qubo::{BinaryArray, Expr, FeedDict, Qubo};
use crate::sampler::{SampleSet, SampleView, SimulatedAnnealingSampler};

/// Placeholder weighting the preference term.
pub const PREFERENCE_PLACEHOLDER: &str = "preference";

/// Option labels of the default 16-column layout.
pub const DEFAULT_COLUMNS: [&str; 16] = [
    "main:grill",
    "main:stir-fry",
    "main:deep-fry",
    "main:simmer",
    "side:raw",
    "side:grill",
    "side:stir-fry",
    "side:deep-fry",
    "side:dressed",
    "side:simmer",
    "side:none",
    "soup",
    "fruit/jelly",
    "rice",
    "barley rice",
    "bread",
];

/// A menu table: one row per dish, one numeric column per option.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuTable {
    /// Option column labels (the dish-name header is dropped).
    pub columns: Vec<String>,
    pub rows: Vec<MenuRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuRow {
    pub name: String,
    pub values: Vec<f64>,
}

impl MenuTable {
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_csv_str(&text)
    }

    /// Parses a header line followed by `name,v1,v2,...` rows.
    ///
    /// Blank lines are skipped; surrounding double quotes are stripped from
    /// fields. Empty numeric cells read as 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_qubo::problems::lunch::MenuTable;
    ///
    /// let table = MenuTable::from_csv_str("dish,a,b\ncurry,1,0\n\"miso, soup\",0,1\n").unwrap();
    /// assert_eq!(table.columns, vec!["a", "b"]);
    /// assert_eq!(table.rows[1].name, "miso, soup");
    /// assert_eq!(table.rows[1].values, vec![0.0, 1.0]);
    /// ```
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_start_matches('\u{feff}')))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or_else(|| QuboError::Csv {
            line: 1,
            message: "missing header".into(),
        })?;
        let header = split_fields(header);
        if header.len() < 2 {
            return Err(QuboError::Csv {
                line: 1,
                message: "expected a name column and at least one option column".into(),
            });
        }
        let columns: Vec<String> = header[1..].to_vec();

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            let fields = split_fields(line);
            if fields.len() != header.len() {
                return Err(QuboError::Csv {
                    line: line_no,
                    message: format!("expected {} fields, found {}", header.len(), fields.len()),
                });
            }
            let values = fields[1..]
                .iter()
                .map(|f| parse_cell(f, line_no))
                .collect::<Result<Vec<f64>>>()?;
            rows.push(MenuRow {
                name: fields[0].clone(),
                values,
            });
        }

        Ok(Self { columns, rows })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

fn parse_cell(field: &str, line: usize) -> Result<f64> {
    if field.is_empty() {
        return Ok(0.0);
    }
    field.parse::<f64>().map_err(|_| QuboError::Csv {
        line,
        message: format!("`{field}` is not a number"),
    })
}

/// Splits one CSV line, honouring double-quoted fields and `""` escapes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// A one-hot category over a contiguous range of option columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Placeholder name of the category weight.
    pub placeholder: String,
    /// First option column (inclusive).
    pub start: usize,
    /// Last option column (exclusive).
    pub end: usize,
    pub weight: f64,
}

impl Category {
    fn new(name: &str, placeholder: &str, start: usize, end: usize) -> Self {
        Self {
            name: name.to_string(),
            placeholder: placeholder.to_string(),
            start,
            end,
            weight: 1.0,
        }
    }
}

/// Menu selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LunchConfig {
    /// CSV file read by the CLI.
    pub input: String,
    pub categories: Vec<Category>,
    /// Weight of the preference term; 0 disables it.
    pub preference_weight: f64,
}

impl Default for LunchConfig {
    /// Columns 0..4, 4..11, 11..13, 13..16. Ranges 11..12 and 12..15 would
    /// leave `bread` unconstrained and put `fruit/jelly` with the staples.
    fn default() -> Self {
        Self {
            input: "data/school_lunch_sendai.csv".into(),
            categories: vec![
                Category::new("main dish cooking", "H1_cover", 0, 4),
                Category::new("side dish cooking", "H2_cover", 4, 11),
                Category::new("soup or dessert", "H3_cover", 11, 13),
                Category::new("staple", "H4_cover", 13, 16),
            ],
            preference_weight: 0.0,
        }
    }
}

/// Menu selection over a loaded table.
#[derive(Debug, Clone)]
pub struct LunchProblem {
    table: MenuTable,
    config: LunchConfig,
    x: BinaryArray,
}

impl LunchProblem {
    /// # Errors
    ///
    /// [`QuboError::InvalidConfig`] when a category range is empty or lies
    /// outside the table's option columns.
    pub fn new(table: MenuTable, config: LunchConfig) -> Result<Self> {
        for cat in &config.categories {
            if cat.start >= cat.end || cat.end > table.num_columns() {
                return Err(QuboError::InvalidConfig(format!(
                    "category `{}` spans columns {}..{} but the table has {} option columns",
                    cat.name,
                    cat.start,
                    cat.end,
                    table.num_columns()
                )));
            }
        }
        let x = BinaryArray::new("x", table.num_rows(), table.num_columns());
        Ok(Self { table, config, x })
    }

    pub fn table(&self) -> &MenuTable {
        &self.table
    }

    pub fn hamiltonian(&self) -> Expr {
        let n = self.table.num_rows();
        let mut h = Expr::Num(0.0);
        for cat in &self.config.categories {
            let penalty: Expr = (0..n)
                .map(|i| {
                    let picked: Expr = (cat.start..cat.end).map(|j| self.x.get(i, j)).sum();
                    (picked - 1.0).pow(2)
                })
                .sum();
            h = h + Expr::placeholder(cat.placeholder.as_str()) * penalty;
        }
        if self.config.preference_weight != 0.0 {
            let affinity: Expr = self
                .table
                .rows
                .iter()
                .enumerate()
                .flat_map(|(i, row)| {
                    row.values
                        .iter()
                        .enumerate()
                        .filter(|&(_, &d)| d != 0.0)
                        .map(move |(j, &d)| d * self.x.get(i, j))
                })
                .sum();
            h = h - Expr::placeholder(PREFERENCE_PLACEHOLDER) * affinity;
        }
        h
    }

    pub fn feed_dict(&self) -> FeedDict {
        let mut feed: FeedDict = self
            .config
            .categories
            .iter()
            .map(|c| (c.placeholder.clone(), c.weight))
            .collect();
        feed.insert(PREFERENCE_PLACEHOLDER, self.config.preference_weight);
        feed
    }

    pub fn create_qubo(&self) -> Result<Qubo> {
        self.hamiltonian().compile()?.to_qubo(&self.feed_dict())
    }

    /// Samples the menu QUBO once with `sampler`.
    pub fn solve(&self, sampler: &SimulatedAnnealingSampler) -> Result<SampleSet> {
        info!(
            dishes = self.table.num_rows(),
            options = self.table.num_columns(),
            "solving lunch menu"
        );
        let qubo = self.create_qubo()?;
        sampler.sample_qubo(&qubo)
    }

    /// Rearranges one record into a dish-by-option table.
    pub fn selection(&self, sample: &SampleView<'_>) -> Result<MenuSelection> {
        let (n, m) = self.x.shape();
        let rows = (0..n)
            .map(|i| {
                let picks = (0..m)
                    .map(|j| {
                        let label = self.x.label(i, j);
                        sample.get(&label).ok_or(QuboError::UnknownVariable(label))
                    })
                    .collect::<Result<Vec<u8>>>()?;
                Ok((self.table.rows[i].name.clone(), picks))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MenuSelection {
            columns: self.table.columns.clone(),
            rows,
            categories: self.config.categories.clone(),
        })
    }
}

/// One sampled menu: the picked options of every dish.
#[derive(Debug, Clone)]
pub struct MenuSelection {
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<u8>)>,
    categories: Vec<Category>,
}

impl MenuSelection {
    /// True when every dish picks exactly one option per category.
    pub fn is_valid(&self) -> bool {
        self.rows.iter().all(|(_, picks)| {
            self.categories.iter().all(|c| {
                picks[c.start..c.end].iter().filter(|&&p| p == 1).count() == 1
            })
        })
    }

    /// Labels of the options picked for dish `i`.
    pub fn picked(&self, i: usize) -> Vec<&str> {
        self.rows[i]
            .1
            .iter()
            .zip(&self.columns)
            .filter(|&(&p, _)| p == 1)
            .map(|(_, c)| c.as_str())
            .collect()
    }
}

impl fmt::Display for MenuSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);
        write!(f, "{:<name_width$}", "dish")?;
        for col in &self.columns {
            write!(f, " {col:>w$}", w = col.chars().count().max(1))?;
        }
        writeln!(f)?;
        for (name, picks) in &self.rows {
            write!(f, "{name:<name_width$}")?;
            for (col, pick) in self.columns.iter().zip(picks) {
                write!(f, " {pick:>w$}", w = col.chars().count().max(1))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SamplerConfig;

    fn table(rows: &[(&str, [u8; 16])]) -> MenuTable {
        let mut csv = String::from("dish");
        for c in DEFAULT_COLUMNS {
            csv.push(',');
            csv.push_str(c);
        }
        csv.push('\n');
        for (name, flags) in rows {
            csv.push_str(name);
            for f in flags {
                csv.push_str(&format!(",{f}"));
            }
            csv.push('\n');
        }
        MenuTable::from_csv_str(&csv).unwrap()
    }

    fn two_dishes() -> MenuTable {
        table(&[
            ("karaage", [0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0]),
            ("sanma", [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0]),
        ])
    }

    #[test]
    fn test_csv_shape_and_errors() {
        let t = two_dishes();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.num_columns(), 16);

        let err = MenuTable::from_csv_str("dish,a,b\nx,1\n").unwrap_err();
        assert!(matches!(err, QuboError::Csv { line: 2, .. }));
        let err = MenuTable::from_csv_str("dish,a\nx,yes\n").unwrap_err();
        assert!(matches!(err, QuboError::Csv { line: 2, .. }));
        assert!(MenuTable::from_csv_str("").is_err());
    }

    #[test]
    fn test_default_categories_partition_columns() {
        let config = LunchConfig::default();
        let mut owner = [0usize; 16];
        for cat in &config.categories {
            for j in cat.start..cat.end {
                owner[j] += 1;
            }
        }
        assert_eq!(owner, [1; 16]);
        let staple = &config.categories[3];
        assert_eq!(&DEFAULT_COLUMNS[staple.start..staple.end], ["rice", "barley rice", "bread"]);
        let soup = &config.categories[2];
        assert_eq!(&DEFAULT_COLUMNS[soup.start..soup.end], ["soup", "fruit/jelly"]);
    }

    #[test]
    fn test_category_out_of_range() {
        let t = MenuTable::from_csv_str("dish,a,b\nx,1,0\n").unwrap();
        let err = LunchProblem::new(t, LunchConfig::default()).unwrap_err();
        assert!(matches!(err, QuboError::InvalidConfig(_)));
    }

    #[test]
    fn test_one_hot_ground_energy_is_zero() {
        let problem = LunchProblem::new(two_dishes(), LunchConfig::default()).unwrap();
        let qubo = problem.create_qubo().unwrap();
        assert_eq!(qubo.len(), 32);
        // rows * categories
        assert_eq!(qubo.offset(), 8.0);
        let mut sample = vec![0u8; 32];
        for i in 0..2 {
            for start in [0, 4, 11, 13] {
                sample[qubo.index_of(&format!("x[{i}][{start}]")).unwrap()] = 1;
            }
        }
        assert_eq!(qubo.energy(&sample) + qubo.offset(), 0.0);
    }

    #[test]
    fn test_preference_term_rewards_flagged_options() {
        let config = LunchConfig {
            preference_weight: 0.5,
            ..LunchConfig::default()
        };
        let problem = LunchProblem::new(two_dishes(), config).unwrap();
        let qubo = problem.create_qubo().unwrap();
        let flagged = qubo.index_of("x[0][2]").unwrap();
        let unflagged = qubo.index_of("x[0][0]").unwrap();
        assert_eq!(qubo.linear()[flagged] + 0.5, qubo.linear()[unflagged]);
    }

    #[test]
    fn test_solve_gives_valid_menu() {
        let problem = LunchProblem::new(two_dishes(), LunchConfig::default()).unwrap();
        let sampler = SimulatedAnnealingSampler::new(
            SamplerConfig::default().with_num_reads(4).with_seed(2),
        );
        let set = problem.solve(&sampler).unwrap();
        let selection = problem.selection(&set.first().unwrap()).unwrap();
        assert!(selection.is_valid(), "{selection}");
        assert_eq!(selection.picked(0).len(), 4);
        let rendered = selection.to_string();
        assert!(rendered.starts_with("dish"));
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_bundled_menu_matches_default_layout() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/school_lunch_sendai.csv");
        let table = MenuTable::from_csv_path(path).unwrap();
        assert_eq!(table.columns, DEFAULT_COLUMNS.map(String::from).to_vec());
        assert_eq!(table.num_rows(), 10);
        assert!(LunchProblem::new(table, LunchConfig::default()).is_ok());
    }
}
