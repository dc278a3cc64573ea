//! Decision Matrix Filters
//!
//! Side-effect free transformations over a [`DecisionMatrix`]. Every filter
//! and sort borrows the receiver and returns a new matrix, so planners running
//! concurrently can share one matrix without interference.

use super::row::{DecisionMatrix, DecisionMatrixRow};

impl DecisionMatrix {
    /// Keep the rows matching a predicate
    pub fn filter_rows<F>(&self, predicate: F) -> DecisionMatrix
    where
        F: Fn(&DecisionMatrixRow) -> bool,
    {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }

    /// Keep rows of the given drive type; an empty type keeps every row
    pub fn filter_by_drive_type(&self, drive_type: &str) -> DecisionMatrix {
        if drive_type.is_empty() {
            return self.clone();
        }
        self.filter_rows(|row| row.drive_type == drive_type)
    }

    /// Keep rows whose IOPS range contains `iops`
    pub fn filter_by_iops(&self, iops: u64) -> DecisionMatrix {
        self.filter_rows(|row| row.serves_iops(iops))
    }

    /// Keep rows whose size range contains an existing drive's size
    pub fn filter_by_drive_size_range(&self, size: u64) -> DecisionMatrix {
        self.filter_rows(|row| row.fits_size(size))
    }

    /// Keep rows that can hold a drive of `size` before it is resized
    pub fn filter_by_drive_size(&self, size: u64) -> DecisionMatrix {
        self.filter_rows(|row| row.fits_size(size))
    }

    /// Keep rows whose per-instance drive count range contains `count`
    pub fn filter_by_drive_count(&self, count: u64) -> DecisionMatrix {
        self.filter_rows(|row| row.fits_drive_count(count))
    }

    /// Stable sort, ascending by minimum IOPS
    pub fn sort_by_iops(&self) -> DecisionMatrix {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| row.min_iops);
        DecisionMatrix::new(rows)
    }

    /// Stable sort, ascending by priority
    pub fn sort_by_priority(&self) -> DecisionMatrix {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| row.priority);
        DecisionMatrix::new(rows)
    }

    /// Largest per-instance drive count across all rows
    pub fn max_instance_drives(&self) -> Option<u64> {
        self.rows.iter().map(|row| row.instance_max_drives).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> DecisionMatrix {
        DecisionMatrix::new(vec![
            DecisionMatrixRow::new("Standard_LRS")
                .with_iops(1, 500)
                .with_size(32, 32767)
                .with_drives(1, 32)
                .with_priority(2),
            DecisionMatrixRow::new("Premium_LRS")
                .with_iops(501, 1100)
                .with_size(256, 256)
                .with_drives(1, 32)
                .with_priority(0),
            DecisionMatrixRow::new("Premium_LRS")
                .with_iops(1, 1100)
                .with_size(128, 8192)
                .with_drives(1, 32)
                .with_priority(1),
            DecisionMatrixRow::new("StandardSSD_LRS")
                .with_iops(1, 6000)
                .with_size(4, 32767)
                .with_drives(2, 16)
                .with_priority(1),
        ])
    }

    #[test]
    fn test_filter_by_drive_type() {
        let matrix = sample_matrix();
        let premium = matrix.filter_by_drive_type("Premium_LRS");
        assert_eq!(premium.len(), 2);
        assert!(premium.iter().all(|r| r.drive_type == "Premium_LRS"));

        assert_eq!(matrix.filter_by_drive_type(""), matrix);
        assert!(matrix.filter_by_drive_type("pd-ssd").is_empty());
    }

    #[test]
    fn test_filter_by_iops() {
        let matrix = sample_matrix();
        let rows = matrix.filter_by_iops(1000);
        let types: Vec<_> = rows.iter().map(|r| r.drive_type.as_str()).collect();
        assert_eq!(types, vec!["Premium_LRS", "Premium_LRS", "StandardSSD_LRS"]);

        assert_eq!(matrix.filter_by_iops(500).len(), 3);
        assert!(matrix.filter_by_iops(7000).is_empty());
    }

    #[test]
    fn test_filter_by_size_and_count() {
        let matrix = sample_matrix();
        assert_eq!(matrix.filter_by_drive_size_range(256).len(), 4);
        assert_eq!(matrix.filter_by_drive_size(16).len(), 1);
        assert_eq!(matrix.filter_by_drive_count(1).len(), 3);
        assert_eq!(matrix.filter_by_drive_count(20).len(), 3);
        assert!(matrix.filter_by_drive_count(33).is_empty());
    }

    #[test]
    fn test_sorts_are_stable() {
        let matrix = sample_matrix();
        let sorted = matrix.sort_by_iops().sort_by_priority();
        let order: Vec<_> = sorted
            .iter()
            .map(|r| (r.drive_type.as_str(), r.min_iops))
            .collect();

        assert_eq!(
            order,
            vec![
                ("Premium_LRS", 501),
                ("Premium_LRS", 1),
                ("StandardSSD_LRS", 1),
                ("Standard_LRS", 1),
            ]
        );

        let by_iops: Vec<_> = matrix.sort_by_iops().iter().map(|r| r.min_iops).collect();
        assert_eq!(by_iops, vec![1, 1, 1, 501]);
        assert_eq!(matrix.sort_by_iops().rows[0].drive_type, "Standard_LRS");
    }

    #[test]
    fn test_filters_never_mutate_input() {
        let matrix = sample_matrix();
        let before = matrix.clone();

        let _ = matrix.filter_by_drive_type("Premium_LRS");
        let _ = matrix.filter_by_iops(1000);
        let _ = matrix.filter_by_drive_size_range(100);
        let _ = matrix.filter_by_drive_size(100);
        let _ = matrix.filter_by_drive_count(40);
        let _ = matrix.sort_by_iops();
        let _ = matrix.sort_by_priority();

        assert_eq!(matrix, before);
    }

    #[test]
    fn test_max_instance_drives() {
        assert_eq!(sample_matrix().max_instance_drives(), Some(32));
        assert_eq!(DecisionMatrix::default().max_instance_drives(), None);
    }
}
