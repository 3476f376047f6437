//! Largest-island selection by sub-network label.
//!
//! Source identifiers embed their sub-network as a positional token
//! (`'ES1 11'` reads as bus 11 of sub-network 1). Everything outside the
//! largest partition is electrically isolated from it and gets dropped
//! before any table is built.
//!
//! The label rule is a naming convention, not a property of the model, so
//! the partition key is a caller-supplied function; [`subnetwork_key`] is
//! the default for the upstream convention.

use gridcase_core::{Bus, CaseError, CaseResult, Diagnostics};
use tracing::debug;

/// Default key extraction: the character at index 2 of the bus identifier.
pub fn subnetwork_key(id: &str) -> Option<String> {
    id.chars().nth(2).map(|c| c.to_string())
}

/// Partition `buses` by `key` and return the identifiers of the largest
/// partition, in input order. Ties resolve to the first-encountered
/// partition of maximal size.
///
/// A bus identifier without an extractable key is a hard error; producing
/// tables from a half-partitioned network would be silently wrong.
pub fn select_main_island<K>(
    buses: &[Bus],
    key: K,
    diag: &mut Diagnostics,
) -> CaseResult<Vec<String>>
where
    K: Fn(&str) -> Option<String>,
{
    // Vec keeps first-encounter order, which makes the tie-break deterministic
    let mut partitions: Vec<(String, Vec<String>)> = Vec::new();
    for bus in buses {
        let label = key(&bus.id).ok_or_else(|| {
            CaseError::Network(format!(
                "bus '{}' has no extractable sub-network label",
                bus.id
            ))
        })?;
        match partitions.iter_mut().find(|(l, _)| *l == label) {
            Some((_, members)) => members.push(bus.id.clone()),
            None => partitions.push((label, vec![bus.id.clone()])),
        }
    }

    // strict comparison so ties keep the earlier partition
    let Some((label, retained)) = partitions
        .iter()
        .reduce(|best, p| if p.1.len() > best.1.len() { p } else { best })
        .cloned()
    else {
        return Ok(Vec::new());
    };

    let discarded = buses.len() - retained.len();
    debug!(label = %label, retained = retained.len(), discarded, "sub-network partition selected");
    if discarded > 0 {
        diag.warn(
            "topology",
            format!(
                "{discarded} bus(es) outside the main island (sub-network '{label}') discarded"
            ),
        );
    }
    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcase_core::{BusControl, Kilovolts};

    fn bus(id: &str) -> Bus {
        Bus {
            id: id.to_string(),
            control: BusControl::Pq,
            v_nom: Kilovolts(380.0),
        }
    }

    #[test]
    fn test_keeps_largest_partition() {
        // sub-network '0': 3 buses, sub-network '1': 7 buses
        let mut buses: Vec<Bus> = (1..=3).map(|i| bus(&format!("ES0 {i}"))).collect();
        buses.extend((1..=7).map(|i| bus(&format!("ES1 {i}"))));

        let mut diag = Diagnostics::new();
        let retained = select_main_island(&buses, subnetwork_key, &mut diag).unwrap();

        assert_eq!(retained.len(), 7);
        assert!(retained.iter().all(|id| id.starts_with("ES1")));
        assert_eq!(diag.warning_count(), 1);
        assert!(diag.issues[0].message.contains("3 bus(es)"));
    }

    #[test]
    fn test_tie_resolves_to_first_encountered() {
        let buses = vec![bus("ES0 1"), bus("ES1 1"), bus("ES0 2"), bus("ES1 2")];
        let mut diag = Diagnostics::new();
        let retained = select_main_island(&buses, subnetwork_key, &mut diag).unwrap();
        assert_eq!(retained, vec!["ES0 1".to_string(), "ES0 2".to_string()]);
    }

    #[test]
    fn test_retains_input_order() {
        let buses = vec![bus("ES1 5"), bus("ES1 2"), bus("ES1 9")];
        let mut diag = Diagnostics::new();
        let retained = select_main_island(&buses, subnetwork_key, &mut diag).unwrap();
        assert_eq!(retained, vec!["ES1 5", "ES1 2", "ES1 9"]);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let mut diag = Diagnostics::new();
        let retained = select_main_island(&[], subnetwork_key, &mut diag).unwrap();
        assert!(retained.is_empty());
    }

    #[test]
    fn test_malformed_identifier_fails_fast() {
        let buses = vec![bus("ES")];
        let mut diag = Diagnostics::new();
        let err = select_main_island(&buses, subnetwork_key, &mut diag).unwrap_err();
        assert!(err.to_string().contains("sub-network label"));
    }

    #[test]
    fn test_custom_key_function() {
        // partition on the prefix before the space instead
        let buses = vec![bus("north 1"), bus("north 2"), bus("south 1")];
        let mut diag = Diagnostics::new();
        let retained = select_main_island(
            &buses,
            |id| id.split_whitespace().next().map(str::to_string),
            &mut diag,
        )
        .unwrap();
        assert_eq!(retained, vec!["north 1", "north 2"]);
    }
}
