use crate::models::Department;

/// Case-insensitive substring match on name or tags. Runs on every keystroke,
/// so it stays a single linear pass over the source.
pub fn apply(query: &str, source: &[Department]) -> Vec<Department> {
    let lower_query = query.to_lowercase();
    source
        .iter()
        .filter(|department| matches(department, &lower_query))
        .cloned()
        .collect()
}

pub fn matches(department: &Department, lower_query: &str) -> bool {
    department
        .department_name
        .to_lowercase()
        .contains(lower_query)
        || department.tags.to_lowercase().contains(lower_query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DepartmentId, DepartmentOwner};

    fn dept(id: u32, name: &str, tags: &str) -> Department {
        Department {
            id: DepartmentId::new(id.to_string()),
            department_name: name.to_string(),
            country: "NL".to_string(),
            location: "Utrecht".to_string(),
            tags: tags.to_string(),
            department_owner: DepartmentOwner::default(),
        }
    }

    fn sample() -> Vec<Department> {
        vec![
            dept(1, "Finance", "money"),
            dept(2, "Legal", "contracts, finance review"),
            dept(3, "Engineering", "platform"),
            dept(4, "Facilities", ""),
        ]
    }

    #[test]
    fn test_matches_name_or_tags_case_insensitively() {
        let source = sample();
        let ids: Vec<_> = apply("finance", &source)
            .iter()
            .map(|d| d.id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(apply("FINANCE", &source), apply("finance", &source));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let source = sample();
        assert_eq!(apply("", &source), source);
    }

    #[test]
    fn test_included_and_excluded_elements_respect_rule() {
        let source = sample();
        for query in ["a", "Fa", "plat", "zzz", "", "ING"] {
            let lower = query.to_lowercase();
            let filtered = apply(query, &source);
            for department in &source {
                let hit = department.department_name.to_lowercase().contains(&lower)
                    || department.tags.to_lowercase().contains(&lower);
                assert_eq!(filtered.contains(department), hit, "query {query:?}");
            }
        }
    }

    #[test]
    fn test_refiltering_is_stable_and_order_preserving() {
        let source = sample();
        let once = apply("i", &source);
        assert_eq!(apply("i", &once), once);

        let positions: Vec<_> = once
            .iter()
            .map(|d| source.iter().position(|s| s.id == d.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
