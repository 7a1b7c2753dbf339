use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{
    CellValue, RecordTable, DURATION, SECTOR, SECURITY_DATE, SECURITY_STATUS, TA_TEAM,
};

/// Records dated before this are stale and never reach the charts.
pub const CUTOFF_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 1) {
    Some(d) => d,
    None => panic!("invalid cutoff date"),
};

/// Status value kept for the duration view.
pub const ACCEPTED: &str = "Accepted";

pub fn cutoff() -> NaiveDateTime {
    CUTOFF_DATE.and_time(chrono::NaiveTime::MIN)
}

// ---------------------------------------------------------------------------
// Row filters
// ---------------------------------------------------------------------------

/// Keep rows whose `Security date` is on or after [`CUTOFF_DATE`].
///
/// A null or non-timestamp date never passes.
pub fn filter_security_data(table: &RecordTable) -> RecordTable {
    let cutoff = cutoff();
    let kept: Vec<_> = table
        .records
        .iter()
        .filter(|r| r.get(SECURITY_DATE).as_datetime().is_some_and(|d| d >= cutoff))
        .cloned()
        .collect();

    let undated = table
        .records
        .iter()
        .filter(|r| r.get(SECURITY_DATE).as_datetime().is_none())
        .count();
    if undated > 0 {
        log::warn!("{undated} row(s) without a usable {SECURITY_DATE:?} were dropped");
    }

    table.with_records(kept)
}

/// Accepted rows with a numeric `Duration`.
pub fn accepted_with_duration(table: &RecordTable) -> RecordTable {
    let accepted: Vec<_> = table
        .records
        .iter()
        .filter(|r| r.get(SECURITY_STATUS).as_text() == Some(ACCEPTED))
        .cloned()
        .collect();
    drop_missing(&table.with_records(accepted), DURATION)
}

/// Drop rows where `column` holds no number.
pub fn drop_missing(table: &RecordTable, column: &str) -> RecordTable {
    table.with_records(
        table
            .records
            .iter()
            .filter(|r| r.get(column).as_f64().is_some())
            .cloned()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// One group of a [`group_count`]: the key tuple and how many rows share it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupCount {
    pub keys: Vec<CellValue>,
    pub count: usize,
}

impl GroupCount {
    /// First key column, as shown on the x-axis.
    pub fn key(&self) -> &CellValue {
        &self.keys[0]
    }
}

/// Count rows per distinct tuple of `keys`. Null keys form their own group.
/// Groups come out in ascending key order.
pub fn group_count(table: &RecordTable, keys: &[&str]) -> Vec<GroupCount> {
    let mut groups: BTreeMap<Vec<CellValue>, usize> = BTreeMap::new();
    for record in &table.records {
        let key: Vec<CellValue> = keys.iter().map(|k| record.get(k).clone()).collect();
        *groups.entry(key).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(keys, count)| GroupCount { keys, count })
        .collect()
}

// ---------------------------------------------------------------------------
// SecurityViews – everything the charts need, derived in one pass
// ---------------------------------------------------------------------------

/// The derived tables behind the three charts.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityViews {
    /// Rows on or after the cutoff.
    pub security: RecordTable,
    /// Rows per TA team.
    pub stat_sec: Vec<GroupCount>,
    /// Rows per (sector, status).
    pub acc_sector: Vec<GroupCount>,
    /// Accepted rows with a duration.
    pub sec_nona: RecordTable,
}

impl SecurityViews {
    pub fn derive(table: &RecordTable) -> Self {
        let security = filter_security_data(table);
        let stat_sec = group_count(&security, &[TA_TEAM]);
        let acc_sector = group_count(&security, &[SECTOR, SECURITY_STATUS]);
        let sec_nona = accepted_with_duration(&security);
        SecurityViews {
            security,
            stat_sec,
            acc_sector,
            sec_nona,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_upload;

    fn table(rows: &str) -> RecordTable {
        let csv = format!(
            "Name,TA Team,\"Security status\nAccepted / Not Accepted\",Sector/Bank/Club/Company,Security date,Duration\n{rows}"
        );
        load_upload("records.csv", csv.as_bytes()).unwrap()
    }

    fn sample() -> RecordTable {
        table(
            "Alice,Team A,Accepted,Bank,2023-01-01 00:00:00,5\n\
             Bob,Team A,Not Accepted,Bank,2023-03-10,\n\
             Carol,Team B,Accepted,Club,2023-05-02,12.5\n\
             Dan,Team B,Accepted,Club,2022-12-31 23:59:59,3\n\
             Eve,Team C,Pending,Bank,2024-01-15,\n\
             Finn,Team C,Accepted,Company,2023-07-07,\n\
             Gus,Team A,Accepted,Bank,,4\n",
        )
    }

    fn names(table: &RecordTable) -> Vec<String> {
        table
            .records
            .iter()
            .map(|r| r.get(crate::data::model::NAME).to_string())
            .collect()
    }

    #[test]
    fn cutoff_is_inclusive() {
        let filtered = filter_security_data(&sample());
        assert_eq!(names(&filtered), ["Alice", "Bob", "Carol", "Eve", "Finn"]);
        assert_eq!(filtered.columns, sample().columns);
    }

    #[test]
    fn team_counts_sum_to_filtered_rows() {
        let views = SecurityViews::derive(&sample());
        let total: usize = views.stat_sec.iter().map(|g| g.count).sum();
        assert_eq!(total, views.security.len());
        assert_eq!(
            views.stat_sec,
            vec![
                GroupCount { keys: vec![CellValue::Text("Team A".into())], count: 2 },
                GroupCount { keys: vec![CellValue::Text("Team B".into())], count: 1 },
                GroupCount { keys: vec![CellValue::Text("Team C".into())], count: 2 },
            ]
        );
    }

    #[test]
    fn sector_counts_are_conserved_per_sector() {
        let views = SecurityViews::derive(&sample());
        for sector in ["Bank", "Club", "Company"] {
            let key = CellValue::Text(sector.into());
            let grouped: usize = views
                .acc_sector
                .iter()
                .filter(|g| g.keys[0] == key)
                .map(|g| g.count)
                .sum();
            let rows = views
                .security
                .records
                .iter()
                .filter(|r| r.get(SECTOR) == &key)
                .count();
            assert_eq!(grouped, rows, "sector {sector}");
        }
    }

    #[test]
    fn unknown_status_is_its_own_group() {
        let views = SecurityViews::derive(&sample());
        assert!(views.acc_sector.contains(&GroupCount {
            keys: vec![CellValue::Text("Bank".into()), CellValue::Text("Pending".into())],
            count: 1,
        }));
    }

    #[test]
    fn duration_view_keeps_accepted_rows_with_duration() {
        let views = SecurityViews::derive(&sample());
        assert_eq!(names(&views.sec_nona), ["Alice", "Carol"]);
        for r in &views.sec_nona.records {
            assert_eq!(r.get(SECURITY_STATUS).as_text(), Some(ACCEPTED));
            assert!(r.get(DURATION).as_f64().is_some());
        }
        assert_eq!(drop_missing(&views.sec_nona, DURATION), views.sec_nona);
    }

    #[test]
    fn null_keys_group_together() {
        let t = table(
            "Alice,,Accepted,Bank,2023-02-01,1\n\
             Bob,,Accepted,Bank,2023-02-01,1\n",
        );
        let counts = group_count(&t, &[TA_TEAM]);
        assert_eq!(counts, vec![GroupCount { keys: vec![CellValue::Null], count: 2 }]);
    }

    #[test]
    fn empty_table_yields_empty_views() {
        let views = SecurityViews::derive(&table(""));
        assert!(views.security.is_empty());
        assert!(views.stat_sec.is_empty());
        assert!(views.acc_sector.is_empty());
        assert!(views.sec_nona.is_empty());
    }

    #[test]
    fn numerically_equal_teams_form_one_group() {
        let t = table(
            "Alice,7,Accepted,Bank,2023-02-01,1\n\
             Bob,7.0,Accepted,Bank,2023-02-01,1\n",
        );
        let views = SecurityViews::derive(&t);
        assert_eq!(
            views.stat_sec,
            vec![GroupCount { keys: vec![CellValue::Float(7.0)], count: 2 }]
        );
    }

    #[test]
    fn padded_status_is_not_accepted() {
        let t = table(
            "Alice,Team A, Accepted ,Bank,2023-02-01,1\n\
             Bob,Team A,Accepted,Bank,2023-02-01,2\n",
        );
        let views = SecurityViews::derive(&t);
        assert_eq!(names(&views.sec_nona), ["Bob"]);
        assert_eq!(views.acc_sector.len(), 2);
    }
}
