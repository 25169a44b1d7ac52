use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1};

use super::error::ClassifierError;
use super::utils::{check_width, squared_distance};
use super::Classifier;

/// K-nearest-neighbours classifier with uniform weights.
///
/// Keeps the whole fitted sample set and votes among the `k` closest points
/// by Euclidean distance. Equal distances keep training order; equal vote
/// counts resolve to the smallest label.
#[derive(Debug, Clone)]
pub struct KNeighbors {
    k: usize,
    fit_x: Array2<f64>,
    fit_y: Vec<i64>,
}

impl KNeighbors {
    pub fn new(k: usize, fit_x: Vec<Vec<f64>>, fit_y: Vec<i64>) -> Result<Self, ClassifierError> {
        if k == 0 {
            return Err(ClassifierError::InvalidModel("n_neighbors must be at least 1".into()));
        }
        if fit_x.is_empty() {
            return Err(ClassifierError::InvalidModel("no fitted samples".into()));
        }
        if fit_x.len() != fit_y.len() {
            return Err(ClassifierError::InvalidModel(format!(
                "{} samples but {} labels",
                fit_x.len(),
                fit_y.len()
            )));
        }
        let width = fit_x[0].len();
        if width == 0 {
            return Err(ClassifierError::InvalidModel("fitted samples have no features".into()));
        }
        if let Some(row) = fit_x.iter().position(|r| r.len() != width) {
            return Err(ClassifierError::InvalidModel(format!(
                "sample {} has {} features, expected {}",
                row,
                fit_x[row].len(),
                width
            )));
        }
        let rows = fit_x.len();
        let flat: Vec<f64> = fit_x.into_iter().flatten().collect();
        if flat.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::InvalidModel("fitted samples must be finite".into()));
        }
        let fit_x = Array2::from_shape_vec((rows, width), flat)
            .map_err(|e| ClassifierError::InvalidModel(e.to_string()))?;
        Ok(Self { k, fit_x, fit_y })
    }

    /// Indices of the `k` nearest fitted samples, closest first.
    pub fn neighbors(&self, x: &ArrayView1<f64>) -> Vec<usize> {
        let mut dists: Vec<(usize, f64)> = self
            .fit_x
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| (i, squared_distance(&row, x)))
            .collect();
        dists.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        dists.into_iter().take(self.k).map(|(i, _)| i).collect()
    }
}

impl Classifier for KNeighbors {
    fn kind(&self) -> &'static str {
        "k_neighbors"
    }

    fn n_features(&self) -> usize {
        self.fit_x.ncols()
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ClassifierError> {
        check_width(&x, self.n_features())?;
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::PredictionError("input contains non-finite values".into()));
        }

        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for idx in self.neighbors(&x) {
            *votes.entry(self.fit_y[idx]).or_insert(0) += 1;
        }

        // BTreeMap iterates labels in ascending order, so keep the first maximum
        let mut best: Option<(i64, usize)> = None;
        for (label, count) in votes {
            match best {
                Some((_, c)) if count <= c => {}
                _ => best = Some((label, count)),
            }
        }
        best.map(|(label, _)| label)
            .ok_or_else(|| ClassifierError::PredictionError("no neighbours found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_clusters(k: usize) -> KNeighbors {
        KNeighbors::new(
            k,
            vec![
                vec![0.0, 0.0],
                vec![0.1, 0.0],
                vec![0.0, 0.1],
                vec![5.0, 5.0],
                vec![5.1, 5.0],
            ],
            vec![0, 0, 0, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_majority_vote() {
        let knn = two_clusters(3);
        assert_eq!(knn.predict(array![0.2, 0.2].view()).unwrap(), 0);
        assert_eq!(knn.predict(array![4.0, 4.5].view()).unwrap(), 1);
    }

    #[test]
    fn test_k_larger_than_sample_set() {
        let knn = two_clusters(50);
        // all five samples vote, three of them are label 0
        assert_eq!(knn.predict(array![5.0, 5.0].view()).unwrap(), 0);
    }

    #[test]
    fn test_vote_tie_goes_to_smallest_label() {
        let knn = KNeighbors::new(2, vec![vec![1.0], vec![-1.0]], vec![1, 0]).unwrap();
        assert_eq!(knn.predict(array![0.0].view()).unwrap(), 0);
    }

    #[test]
    fn test_neighbors_ordered_by_distance() {
        let knn = two_clusters(2);
        assert_eq!(knn.neighbors(&array![5.2, 5.0].view()), vec![4, 3]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(KNeighbors::new(0, vec![vec![1.0]], vec![0]).is_err());
        assert!(KNeighbors::new(1, vec![], vec![]).is_err());
        assert!(KNeighbors::new(1, vec![vec![1.0]], vec![0, 1]).is_err());
        assert!(KNeighbors::new(1, vec![vec![1.0], vec![1.0, 2.0]], vec![0, 1]).is_err());
    }

    #[test]
    fn test_rejects_nan_input() {
        let knn = two_clusters(1);
        assert!(matches!(
            knn.predict(array![f64::NAN, 0.0].view()),
            Err(ClassifierError::PredictionError(_))
        ));
    }
}
