use std::collections::HashMap;

use crate::dashboard::types::{DeploymentStatusEntry, ServiceTagInfo, StatusListDashboard};
use crate::models::ExecutionPageRow;

/// Project one category page into listing entries, preserving input order
/// and attaching the tag side-data where the map has the execution id.
pub fn assemble_entries(
    rows: &[ExecutionPageRow],
    tags: &HashMap<String, Vec<ServiceTagInfo>>,
) -> Vec<DeploymentStatusEntry> {
    rows.iter()
        .map(|row| DeploymentStatusEntry {
            name: row.name.clone(),
            start_ts: row.start_ts,
            end_ts: row.end_ts,
            status: row.status.clone(),
            service_info_list: tags.get(&row.id).cloned(),
        })
        .collect()
}

/// Combine the three category pages into one dashboard result. Each page is
/// fetched upstream with its own disjoint status filter.
pub fn status_lists(
    failure: (&[ExecutionPageRow], &HashMap<String, Vec<ServiceTagInfo>>),
    active: (&[ExecutionPageRow], &HashMap<String, Vec<ServiceTagInfo>>),
    pending: (&[ExecutionPageRow], &HashMap<String, Vec<ServiceTagInfo>>),
) -> StatusListDashboard {
    StatusListDashboard {
        failure: assemble_entries(failure.0, failure.1),
        active: assemble_entries(active.0, active.1),
        pending: assemble_entries(pending.0, pending.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(prefix: u32, statuses: [&str; 8]) -> Vec<ExecutionPageRow> {
        let names = ["name1", "name2", "name3", "name4", "name5", "name1", "name2", "name3"];
        let start_ts: [i64; 8] = [
            1619626802000,
            1619885951000,
            1619885925000,
            1619799469000,
            1619885815000,
            1619972127000,
            1619799299000,
            1619885632000,
        ];
        let end_ts: [i64; 8] = [
            1622218802000,
            1622564351000,
            1622564325000,
            1622391469000,
            1622564215000,
            1622650527000,
            1622391299000,
            1622564032000,
        ];
        (0..8)
            .map(|i| ExecutionPageRow {
                id: format!("{}{}", prefix, i + 1),
                name: names[i].to_string(),
                status: statuses[i].to_string(),
                start_ts: start_ts[i],
                end_ts: end_ts[i],
            })
            .collect()
    }

    fn tag(service_name: &str, tag: Option<&str>) -> ServiceTagInfo {
        ServiceTagInfo {
            service_name: service_name.to_string(),
            service_tag: tag.map(|t| t.to_string()),
        }
    }

    #[test]
    fn attaches_tags_only_where_the_side_map_has_entries() {
        let rows = page(
            1,
            ["FAILED", "ABORTED", "FAILED", "ABORTED", "FAILED", "EXPIRED", "EXPIRED", "FAILED"],
        );
        let mut tags = HashMap::new();
        tags.insert("11".to_string(), vec![tag("serviceF1", Some("tagF1")), tag("serviceF2", None)]);
        tags.insert("13".to_string(), vec![tag("serviceF3", Some("tagF3"))]);
        tags.insert("15".to_string(), vec![tag("serviceF1", Some("tagF1")), tag("serviceF2", Some("tagF2"))]);

        let entries = assemble_entries(&rows, &tags);
        assert_eq!(entries.len(), 8);

        // input order is preserved, no re-sorting
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["name1", "name2", "name3", "name4", "name5", "name1", "name2", "name3"]);

        assert_eq!(
            entries[0].service_info_list,
            Some(vec![tag("serviceF1", Some("tagF1")), tag("serviceF2", None)])
        );
        assert_eq!(entries[2].service_info_list, Some(vec![tag("serviceF3", Some("tagF3"))]));
        assert_eq!(
            entries[4].service_info_list,
            Some(vec![tag("serviceF1", Some("tagF1")), tag("serviceF2", Some("tagF2"))])
        );
        // "name4" has no side-map entry and carries no list at all
        assert_eq!(entries[3].name, "name4");
        assert!(entries[3].service_info_list.is_none());
        assert!(entries[5].service_info_list.is_none());

        assert_eq!(entries[0].start_ts, 1619626802000);
        assert_eq!(entries[0].end_ts, 1622218802000);
        assert_eq!(entries[0].status, "FAILED");
    }

    #[test]
    fn omitted_tag_lists_are_absent_from_the_json() {
        let rows = page(1, ["FAILED"; 8]);
        let entries = assemble_entries(&rows, &HashMap::new());
        let json = serde_json::to_value(&entries[3]).unwrap();
        assert!(json.get("serviceInfoList").is_none());
        assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("name4"));
    }

    #[test]
    fn combines_the_three_categories() {
        let failure_rows = page(
            1,
            ["FAILED", "ABORTED", "FAILED", "ABORTED", "FAILED", "EXPIRED", "EXPIRED", "FAILED"],
        );
        let active_rows = page(
            2,
            ["RUNNING", "PAUSED", "RUNNING", "PAUSED", "RUNNING", "RUNNING", "PAUSED", "RUNNING"],
        );
        let pending_rows = page(
            3,
            [
                "INTERVENTIONWAITING",
                "APPROVALWAITING",
                "INTERVENTIONWAITING",
                "APPROVALWAITING",
                "INTERVENTIONWAITING",
                "INTERVENTIONWAITING",
                "APPROVALWAITING",
                "INTERVENTIONWAITING",
            ],
        );
        let empty = HashMap::new();
        let dashboard =
            status_lists((&failure_rows, &empty), (&active_rows, &empty), (&pending_rows, &empty));
        assert_eq!(dashboard.failure.len(), 8);
        assert_eq!(dashboard.active.len(), 8);
        assert_eq!(dashboard.pending.len(), 8);
        assert_eq!(dashboard.active[0].status, "RUNNING");
        assert_eq!(dashboard.pending[1].status, "APPROVALWAITING");
        assert!(dashboard.active.iter().all(|e| e.service_info_list.is_none()));
    }
}
