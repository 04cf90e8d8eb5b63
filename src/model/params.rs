//! Parameter-space declarations handed to an external model search.
//!
//! Only the candidate values are declared here; how the space is searched is
//! up to the consumer.

use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

impl ParamValues {
    pub fn len(&self) -> usize {
        match self {
            ParamValues::Int(v) => v.len(),
            ParamValues::Float(v) => v.len(),
            ParamValues::Bool(v) => v.len(),
            ParamValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ParamValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = match self {
            ParamValues::Int(v) => v.iter().join(","),
            ParamValues::Float(v) => v.iter().join(","),
            ParamValues::Bool(v) => v.iter().join(","),
            ParamValues::Text(v) => v.iter().join(","),
        };
        write!(f, "{}", joined)
    }
}

/// Named candidate values in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGrid {
    params: Vec<(String, ParamValues)>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the candidates of `name`.
    pub fn with(mut self, name: &str, values: ParamValues) -> Self {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = values,
            None => self.params.push((name.to_string(), values)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValues> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValues)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of distinct parameter combinations.
    pub fn size(&self) -> usize {
        self.params.iter().map(|(_, v)| v.len()).product()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpace {
    pub preprocessor: ParameterGrid,
    pub vectorizer: ParameterGrid,
    pub estimator: ParameterGrid,
}

impl ParameterSpace {
    pub fn size(&self) -> usize {
        self.preprocessor.size() * self.vectorizer.size() * self.estimator.size()
    }

    fn sections(&self) -> [(&'static str, &ParameterGrid); 3] {
        [
            ("preprocessor", &self.preprocessor),
            ("vectorizer", &self.vectorizer),
            ("estimator", &self.estimator),
        ]
    }
}

impl fmt::Display for ParameterSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (section, grid) in self.sections() {
            for (name, values) in grid.iter() {
                writeln!(f, "{}\t{}\t{}", section, name, values)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_is_product_of_candidates() {
        let grid = ParameterGrid::new()
            .with("r", ParamValues::Int(vec![1, 2, 3]))
            .with("normalization", ParamValues::Bool(vec![true, false]));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.size(), 6);
        assert_eq!(ParameterGrid::new().size(), 1);
    }

    #[test]
    fn grid_replaces_existing_parameter() {
        let grid = ParameterGrid::new()
            .with("d", ParamValues::Int(vec![1, 2]))
            .with("d", ParamValues::Int(vec![4]));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get("d"), Some(&ParamValues::Int(vec![4])));
        assert_eq!(grid.get("r"), None);
    }

    #[test]
    fn space_prints_one_line_per_parameter() {
        let space = ParameterSpace {
            preprocessor: ParameterGrid::new().with("viewpoint_weight", ParamValues::Float(vec![1.0, 0.5])),
            vectorizer: ParameterGrid::new().with("nbits", ParamValues::Int(vec![14, 16])),
            estimator: ParameterGrid::new()
                .with("penalty", ParamValues::Text(vec!["l1".into(), "l2".into()]))
                .with("average", ParamValues::Bool(vec![true])),
        };
        assert_eq!(space.size(), 8);
        assert_eq!(
            space.to_string(),
            "preprocessor\tviewpoint_weight\t1,0.5\n\
             vectorizer\tnbits\t14,16\n\
             estimator\tpenalty\tl1,l2\n\
             estimator\taverage\ttrue\n"
        );
    }
}
