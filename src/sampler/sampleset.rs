//! Sample result sets.

use std::collections::{BTreeMap, HashMap};

/// One annealing outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// Variable values in [`SampleSet::variables`] order.
    pub sample: Vec<u8>,
    /// QUBO energy, offset excluded.
    pub energy: f64,
    pub num_occurrences: usize,
}

/// Records returned by a sampler, sorted by ascending energy.
///
/// Ties keep the order in which the samples were produced.
#[derive(Debug, Clone)]
pub struct SampleSet {
    variables: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<SampleRecord>,
}

impl SampleSet {
    /// Builds a set from raw `(sample, energy)` pairs, one occurrence each.
    pub fn from_samples(variables: Vec<String>, samples: Vec<(Vec<u8>, f64)>) -> Self {
        let records = samples
            .into_iter()
            .map(|(sample, energy)| SampleRecord {
                sample,
                energy,
                num_occurrences: 1,
            })
            .collect();
        Self::from_records(variables, records)
    }

    fn from_records(variables: Vec<String>, mut records: Vec<SampleRecord>) -> Self {
        records.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        let index = variables
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            variables,
            index,
            records,
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates `(sample, energy, num_occurrences)` views, lowest energy first.
    pub fn data(&self) -> impl Iterator<Item = SampleView<'_>> {
        self.records
            .iter()
            .map(move |record| SampleView { set: self, record })
    }

    /// The lowest-energy record.
    pub fn first(&self) -> Option<SampleView<'_>> {
        self.data().next()
    }

    /// Sum of `num_occurrences` over all records.
    pub fn total_occurrences(&self) -> usize {
        self.records.iter().map(|r| r.num_occurrences).sum()
    }

    /// Merges records with identical assignments, summing occurrences.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_qubo::sampler::SampleSet;
    ///
    /// let set = SampleSet::from_samples(
    ///     vec!["a".into()],
    ///     vec![(vec![1], -1.0), (vec![0], 0.0), (vec![1], -1.0)],
    /// );
    /// let merged = set.aggregate();
    /// assert_eq!(merged.len(), 2);
    /// assert_eq!(merged.first().unwrap().num_occurrences(), 2);
    /// assert_eq!(merged.total_occurrences(), 3);
    /// ```
    pub fn aggregate(&self) -> SampleSet {
        let mut seen: HashMap<&[u8], usize> = HashMap::new();
        let mut merged: Vec<SampleRecord> = Vec::new();
        for record in &self.records {
            match seen.get(record.sample.as_slice()) {
                Some(&pos) => merged[pos].num_occurrences += record.num_occurrences,
                None => {
                    seen.insert(record.sample.as_slice(), merged.len());
                    merged.push(record.clone());
                }
            }
        }
        Self::from_records(self.variables.clone(), merged)
    }
}

/// Borrowed view of one record with label-based access.
#[derive(Debug, Clone, Copy)]
pub struct SampleView<'a> {
    set: &'a SampleSet,
    record: &'a SampleRecord,
}

impl<'a> SampleView<'a> {
    /// Value of a variable, or `None` if the label is unknown.
    pub fn get(&self, label: &str) -> Option<u8> {
        self.set
            .index
            .get(label)
            .map(|&i| self.record.sample[i])
    }

    pub fn sample(&self) -> &'a [u8] {
        &self.record.sample
    }

    pub fn energy(&self) -> f64 {
        self.record.energy
    }

    pub fn num_occurrences(&self) -> usize {
        self.record.num_occurrences
    }

    /// Label to value map.
    pub fn to_map(&self) -> BTreeMap<&'a str, u8> {
        self.set
            .variables
            .iter()
            .map(String::as_str)
            .zip(self.record.sample.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_by_energy_stable() {
        let set = SampleSet::from_samples(
            labels(&["a", "b"]),
            vec![(vec![0, 0], 1.0), (vec![1, 0], -2.0), (vec![0, 1], 1.0)],
        );
        let energies: Vec<f64> = set.data().map(|v| v.energy()).collect();
        assert_eq!(energies, vec![-2.0, 1.0, 1.0]);
        let samples: Vec<&[u8]> = set.data().map(|v| v.sample()).collect();
        assert_eq!(samples[1], [0u8, 0]);
        assert_eq!(samples[2], [0u8, 1]);
    }

    #[test]
    fn test_view_lookup() {
        let set = SampleSet::from_samples(labels(&["x[0][0]", "x[0][1]"]), vec![(vec![0, 1], 0.0)]);
        let view = set.first().unwrap();
        assert_eq!(view.get("x[0][1]"), Some(1));
        assert_eq!(view.get("x[0][0]"), Some(0));
        assert_eq!(view.get("y"), None);
        assert_eq!(view.to_map()["x[0][1]"], 1);
    }

    #[test]
    fn test_empty_set() {
        let set = SampleSet::from_samples(labels(&["a"]), Vec::new());
        assert!(set.is_empty());
        assert!(set.first().is_none());
        assert_eq!(set.total_occurrences(), 0);
    }
}
