use crate::models::{ContentType, FeedCursor, Title};

/// Raw feed query parameters, exactly as the client sent them
///
/// Built from the raw key/value pairs so that malformed or repeated values
/// reach the translator instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedParams {
    pub content_type: Option<String>,
    pub genres: Option<String>,
    pub countries: Option<String>,
    pub lang: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub cursor: Option<String>,
}

impl FeedParams {
    /// Collects known keys, keeping the first value of a repeated key
    ///
    /// Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = FeedParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "type" => &mut params.content_type,
                "genres" => &mut params.genres,
                "countries" => &mut params.countries,
                "lang" => &mut params.lang,
                "year_min" => &mut params.year_min,
                "year_max" => &mut params.year_max,
                "cursor" => &mut params.cursor,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Inclusive year bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl YearRange {
    /// Titles without a year never fall inside a range
    pub fn contains(&self, year: Option<i32>) -> bool {
        let Some(year) = year else {
            return false;
        };
        self.min.map_or(true, |min| year >= min) && self.max.map_or(true, |max| year <= max)
    }
}

/// Typed catalog predicate
///
/// `None` and empty lists mean "no constraint" on that dimension. List
/// dimensions match when the title shares at least one value with the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePredicate {
    pub content_type: Option<ContentType>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub year: Option<YearRange>,
}

impl TitlePredicate {
    pub fn matches(&self, title: &Title) -> bool {
        if let Some(content_type) = self.content_type {
            if title.content_type != content_type {
                return false;
            }
        }

        any_of(&self.genres, &title.genres)
            && any_of(&self.countries, &title.countries)
            && any_of(&self.languages, &title.languages)
            && self.year.map_or(true, |range| range.contains(title.year))
    }
}

fn any_of(wanted: &[String], actual: &[String]) -> bool {
    wanted.is_empty() || wanted.iter().any(|value| actual.contains(value))
}

/// Translates raw parameters into a predicate plus resume cursor
///
/// Never fails: unknown content types, unparsable years and blank list
/// entries all degrade to "no constraint".
pub fn translate(params: &FeedParams) -> (TitlePredicate, Option<FeedCursor>) {
    let content_type = params.content_type.as_deref().and_then(ContentType::parse);

    let min = parse_year(params.year_min.as_deref());
    let max = parse_year(params.year_max.as_deref());
    let year = (min.is_some() || max.is_some()).then_some(YearRange { min, max });

    let predicate = TitlePredicate {
        content_type,
        genres: parse_list(params.genres.as_deref()),
        countries: parse_list(params.countries.as_deref()),
        languages: parse_list(params.lang.as_deref()),
        year,
    };

    let cursor = params.cursor.as_deref().and_then(FeedCursor::parse);

    (predicate, cursor)
}

/// Splits a comma-separated list, trimming entries and dropping empty ones
pub fn parse_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a leading integer, ignoring anything after the digits
///
/// Zero is treated as unset, as is anything without leading digits or out of
/// `i32` range.
fn parse_year(value: Option<&str>) -> Option<i32> {
    let value = value?.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let year = digits[..end].parse::<i32>().ok()? * sign;

    (year != 0).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn params(pairs: &[(&str, &str)]) -> FeedParams {
        FeedParams::from_pairs(pairs.iter().copied())
    }

    fn title_with(year: Option<i32>, genres: &[&str]) -> Title {
        let mut title = Title::new("T", ContentType::Movie, Utc::now());
        title.year = year;
        title.genres = genres.iter().map(|g| g.to_string()).collect();
        title
    }

    #[test]
    fn test_empty_params_are_unconstrained() {
        let (predicate, cursor) = translate(&FeedParams::default());
        assert_eq!(predicate, TitlePredicate::default());
        assert_eq!(cursor, None);
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let params = params(&[
            ("genres", "drama"),
            ("type", "movie"),
            ("genres", "horror"),
            ("type", "tv"),
            ("utm_source", "newsletter"),
        ]);
        assert_eq!(params.genres.as_deref(), Some("drama"));
        assert_eq!(params.content_type.as_deref(), Some("movie"));

        let (predicate, _) = translate(&params);
        assert_eq!(predicate.genres, vec!["drama"]);
        assert_eq!(predicate.content_type, Some(ContentType::Movie));
    }

    #[test]
    fn test_list_parsing_drops_blank_entries() {
        assert_eq!(parse_list(Some("foo,,bar")), vec!["foo", "bar"]);
        assert_eq!(parse_list(Some(" drama , crime ")), vec!["drama", "crime"]);
        assert!(parse_list(Some(",, ,")).is_empty());
        assert!(parse_list(None).is_empty());
    }

    #[test]
    fn test_bogus_type_is_ignored() {
        let (predicate, _) = translate(&params(&[("type", "bogus")]));
        assert_eq!(predicate.content_type, None);

        let (predicate, _) = translate(&params(&[("type", "tv")]));
        assert_eq!(predicate.content_type, Some(ContentType::Tv));
    }

    #[test]
    fn test_year_parsing() {
        assert_eq!(parse_year(Some("1999")), Some(1999));
        assert_eq!(parse_year(Some("1999abc")), Some(1999));
        assert_eq!(parse_year(Some("abc")), None);
        assert_eq!(parse_year(Some("")), None);
        assert_eq!(parse_year(Some("0")), None);
        assert_eq!(parse_year(Some("99999999999")), None);
        assert_eq!(parse_year(None), None);
    }

    #[test]
    fn test_half_open_year_range() {
        let (predicate, _) = translate(&params(&[("year_min", "2000"), ("year_max", "soon")]));
        assert_eq!(
            predicate.year,
            Some(YearRange {
                min: Some(2000),
                max: None
            })
        );
        assert!(predicate.matches(&title_with(Some(2024), &[])));
        assert!(!predicate.matches(&title_with(Some(1999), &[])));
        assert!(!predicate.matches(&title_with(None, &[])));
    }

    #[test]
    fn test_inverted_year_range_matches_nothing() {
        let (predicate, _) = translate(&params(&[("year_min", "2000"), ("year_max", "1999")]));
        for year in [1998, 1999, 2000, 2001] {
            assert!(!predicate.matches(&title_with(Some(year), &[])));
        }
    }

    #[test]
    fn test_genres_match_any_of() {
        let (predicate, _) = translate(&params(&[("genres", "horror,comedy")]));
        assert!(predicate.matches(&title_with(None, &["drama", "comedy"])));
        assert!(!predicate.matches(&title_with(None, &["drama"])));
        assert!(!predicate.matches(&title_with(None, &[])));
    }

    #[test]
    fn test_cursor_is_passed_through() {
        let (_, cursor) = translate(&params(&[("cursor", "opaque-token")]));
        assert_eq!(cursor.unwrap().as_str(), "opaque-token");

        let (_, cursor) = translate(&params(&[("cursor", "")]));
        assert_eq!(cursor, None);
    }
}
