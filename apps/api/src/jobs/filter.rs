//! Filter compiler — turns raw search parameters into a predicate list over
//! the jobs table, rendered into a `QueryBuilder` with bound parameters only.
//! User values never reach the SQL text.

use sqlx::{Postgres, QueryBuilder};

/// Raw search dimensions as they arrive from the query string. Multi-value
/// dimensions are comma-separated.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub search: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub ids: Option<String>,
}

/// One compiled predicate. Dimensions AND together; `HasSkill` appears once
/// per requested skill so the skills dimension is conjunctive, unlike the
/// OR-shaped `LocationAny`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring over title, company name, and skill names.
    Keyword(String),
    /// Case-insensitive substring over location; any value may match.
    LocationAny(Vec<String>),
    /// Exact IN match. Unknown levels are bound as given and match no rows.
    ExperienceIn(Vec<String>),
    /// Explicit inclusion list (saved-job ids from the client).
    IdsIn(Vec<i64>),
    /// `ids` was supplied but no value parsed: matches nothing, which is
    /// distinct from omitting the filter entirely.
    MatchNone,
    /// The job carries this exact skill name.
    HasSkill(String),
}

#[derive(Debug, Default, PartialEq)]
pub struct JobFilter {
    predicates: Vec<Predicate>,
}

impl JobFilter {
    /// Compiles raw parameters into a predicate list. Absent or blank
    /// dimensions are omitted; malformed numeric ids are silently dropped
    /// (policy, not an oversight).
    pub fn compile(params: &SearchParams) -> JobFilter {
        let mut predicates = Vec::new();

        if let Some(term) = params.search.as_deref().map(str::trim) {
            if !term.is_empty() {
                predicates.push(Predicate::Keyword(term.to_string()));
            }
        }

        if let Some(raw) = params.location.as_deref() {
            let locations = split_list(raw);
            if !locations.is_empty() {
                predicates.push(Predicate::LocationAny(locations));
            }
        }

        if let Some(raw) = params.experience.as_deref() {
            let levels = split_list(raw);
            if !levels.is_empty() {
                predicates.push(Predicate::ExperienceIn(levels));
            }
        }

        if let Some(raw) = params.ids.as_deref() {
            if !raw.trim().is_empty() {
                let ids: Vec<i64> = raw
                    .split(',')
                    .filter_map(|s| s.trim().parse::<i64>().ok())
                    .collect();
                if ids.is_empty() {
                    predicates.push(Predicate::MatchNone);
                } else {
                    predicates.push(Predicate::IdsIn(ids));
                }
            }
        }

        if let Some(raw) = params.skills.as_deref() {
            for skill in split_list(raw) {
                predicates.push(Predicate::HasSkill(skill));
            }
        }

        JobFilter { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Appends a WHERE clause to a query whose jobs table is aliased `j`.
    /// Appends nothing when no dimension is active.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.predicates.is_empty() {
            return;
        }
        qb.push(" WHERE ");
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            predicate.push_sql(qb);
        }
    }
}

impl Predicate {
    fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::Keyword(term) => {
                let pattern = like_pattern(term);
                qb.push("(j.title ILIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" OR j.company_name ILIKE ");
                qb.push_bind(pattern.clone());
                qb.push(
                    " OR EXISTS (SELECT 1 FROM job_skills js \
                     JOIN skills s ON s.id = js.skill_id \
                     WHERE js.job_id = j.id AND s.name ILIKE ",
                );
                qb.push_bind(pattern);
                qb.push("))");
            }
            Predicate::LocationAny(locations) => {
                qb.push("(");
                for (i, loc) in locations.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push("j.location ILIKE ");
                    qb.push_bind(like_pattern(loc));
                }
                qb.push(")");
            }
            Predicate::ExperienceIn(levels) => {
                qb.push("j.experience_level IN (");
                let mut sep = qb.separated(", ");
                for level in levels {
                    sep.push_bind(level.clone());
                }
                sep.push_unseparated(")");
            }
            Predicate::IdsIn(ids) => {
                qb.push("j.id IN (");
                let mut sep = qb.separated(", ");
                for id in ids {
                    sep.push_bind(*id);
                }
                sep.push_unseparated(")");
            }
            Predicate::MatchNone => {
                qb.push("FALSE");
            }
            Predicate::HasSkill(name) => {
                qb.push(
                    "EXISTS (SELECT 1 FROM job_skills js \
                     JOIN skills s ON s.id = js.skill_id \
                     WHERE js.job_id = j.id AND s.name = ",
                );
                qb.push_bind(name.clone());
                qb.push(")");
            }
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Wraps a term for substring matching, escaping LIKE metacharacters so a
/// literal `%` or `_` in user input stays literal.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(params: SearchParams) -> JobFilter {
        JobFilter::compile(&params)
    }

    fn rendered(filter: &JobFilter) -> String {
        let mut qb = QueryBuilder::new("SELECT COUNT(DISTINCT j.id) FROM jobs j");
        filter.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_no_params_compiles_to_no_predicates() {
        let filter = compile(SearchParams::default());
        assert!(filter.predicates().is_empty());
        assert_eq!(rendered(&filter), "SELECT COUNT(DISTINCT j.id) FROM jobs j");
    }

    #[test]
    fn test_blank_dimensions_are_omitted() {
        let filter = compile(SearchParams {
            search: Some("   ".to_string()),
            location: Some(" , ,".to_string()),
            experience: Some("".to_string()),
            skills: Some(",".to_string()),
            ids: None,
        });
        assert!(filter.predicates().is_empty());
    }

    #[test]
    fn test_keyword_spans_title_company_and_skills() {
        let filter = compile(SearchParams {
            search: Some("rust".to_string()),
            ..Default::default()
        });
        let sql = rendered(&filter);
        assert!(sql.contains("j.title ILIKE $1"), "sql was: {sql}");
        assert!(sql.contains("j.company_name ILIKE $2"), "sql was: {sql}");
        assert!(sql.contains("s.name ILIKE $3"), "sql was: {sql}");
    }

    #[test]
    fn test_location_is_or_within_dimension() {
        let filter = compile(SearchParams {
            location: Some("Remote, Pune".to_string()),
            ..Default::default()
        });
        assert_eq!(
            filter.predicates(),
            &[Predicate::LocationAny(vec![
                "Remote".to_string(),
                "Pune".to_string()
            ])]
        );
        let sql = rendered(&filter);
        assert!(
            sql.contains("(j.location ILIKE $1 OR j.location ILIKE $2)"),
            "sql was: {sql}"
        );
    }

    #[test]
    fn test_experience_is_exact_in_match() {
        let filter = compile(SearchParams {
            experience: Some("mid,senior".to_string()),
            ..Default::default()
        });
        let sql = rendered(&filter);
        assert!(
            sql.contains("j.experience_level IN ($1, $2)"),
            "sql was: {sql}"
        );
    }

    #[test]
    fn test_skills_are_conjunctive_one_exists_per_skill() {
        let filter = compile(SearchParams {
            skills: Some("Go,Docker".to_string()),
            ..Default::default()
        });
        assert_eq!(
            filter.predicates(),
            &[
                Predicate::HasSkill("Go".to_string()),
                Predicate::HasSkill("Docker".to_string()),
            ]
        );
        let sql = rendered(&filter);
        assert_eq!(sql.matches("EXISTS (SELECT 1 FROM job_skills").count(), 2);
        assert!(sql.contains(" AND EXISTS"), "sql was: {sql}");
    }

    #[test]
    fn test_ids_parse_and_malformed_entries_drop() {
        let filter = compile(SearchParams {
            ids: Some("3, x, 7,nine".to_string()),
            ..Default::default()
        });
        assert_eq!(filter.predicates(), &[Predicate::IdsIn(vec![3, 7])]);
    }

    #[test]
    fn test_ids_present_but_empty_matches_nothing() {
        let filter = compile(SearchParams {
            ids: Some("abc,".to_string()),
            ..Default::default()
        });
        assert_eq!(filter.predicates(), &[Predicate::MatchNone]);
        let sql = rendered(&filter);
        assert!(sql.ends_with(" WHERE FALSE"), "sql was: {sql}");
    }

    #[test]
    fn test_blank_ids_means_no_filter() {
        let filter = compile(SearchParams {
            ids: Some("  ".to_string()),
            ..Default::default()
        });
        assert!(filter.predicates().is_empty());
    }

    #[test]
    fn test_dimensions_combine_with_and_in_compile_order() {
        let filter = compile(SearchParams {
            search: Some("engineer".to_string()),
            location: Some("Remote".to_string()),
            experience: Some("senior".to_string()),
            skills: Some("Rust".to_string()),
            ids: Some("1,2".to_string()),
        });
        assert_eq!(filter.predicates().len(), 5);
        // Parameter numbering tracks compile order: keyword binds three
        // patterns, then location, experience, ids, and the skill subquery.
        let sql = rendered(&filter);
        assert!(sql.contains("j.location ILIKE $4"), "sql was: {sql}");
        assert!(sql.contains("j.experience_level IN ($5)"), "sql was: {sql}");
        assert!(sql.contains("j.id IN ($6, $7)"), "sql was: {sql}");
        assert!(sql.contains("s.name = $8"), "sql was: {sql}");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("c_plus"), "%c\\_plus%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
