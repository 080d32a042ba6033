use regex::RegexBuilder;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub(crate) struct ListPostsParams {
    pub(crate) page: Option<String>,
    pub(crate) limit: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) featured: Option<String>,
    pub(crate) lastid: Option<String>,
    pub(crate) lastcreatedon: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) keyword: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortOrder {
    ViewsDesc,
    CreatedOnDesc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Stage {
    LookupAuthor,
    AuthorUsername(String),
    TagContains(String),
    Sort(SortOrder),
    CreatedBefore(i64),
    TitleMatches(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListPipeline {
    pub(crate) stages: Vec<Stage>,
    pub(crate) offset: i64,
    pub(crate) limit: i64,
}

impl ListPipeline {
    pub(crate) fn build(params: &ListPostsParams, default_limit: i64) -> Self {
        let mut stages = vec![Stage::LookupAuthor];

        if let Some(username) = provided(&params.username) {
            stages.push(Stage::AuthorUsername(username.to_string()));
        }

        if let Some(tag) = provided(&params.tag) {
            stages.push(Stage::TagContains(tag.to_string()));
        }

        let order = match params.featured.as_deref() {
            Some("true") => SortOrder::ViewsDesc,
            _ => SortOrder::CreatedOnDesc,
        };
        stages.push(Stage::Sort(order));

        if let Some(cursor) = provided(&params.lastcreatedon) {
            // неразборный курсор не пропускает ни одного поста
            let before = parse_leading_int(cursor).unwrap_or(i64::MIN);
            stages.push(Stage::CreatedBefore(before));
        }

        if let Some(keyword) = provided(&params.keyword) {
            stages.push(Stage::TitleMatches(keyword_pattern(keyword)));
        }

        if let Some(lastid) = provided(&params.lastid) {
            debug!(lastid, "lastid is accepted but does not affect filtering");
        }

        let offset = provided(&params.page)
            .and_then(parse_leading_int)
            .filter(|offset| *offset > 0)
            .unwrap_or(0);
        let limit = provided(&params.limit)
            .and_then(parse_leading_int)
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit);

        Self {
            stages,
            offset,
            limit,
        }
    }

    pub(crate) fn sort_order(&self) -> SortOrder {
        self.stages
            .iter()
            .find_map(|stage| match stage {
                Stage::Sort(order) => Some(*order),
                _ => None,
            })
            .unwrap_or(SortOrder::CreatedOnDesc)
    }
}

// невалидное выражение ищется как обычная строка
fn keyword_pattern(keyword: &str) -> String {
    match RegexBuilder::new(keyword).case_insensitive(true).build() {
        Ok(_) => keyword.to_string(),
        Err(err) => {
            debug!(keyword, error = %err, "keyword is not a valid regex, matching literally");
            regex::escape(keyword)
        }
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

// как parseInt: знак и ведущие цифры, хвост игнорируется
pub(crate) fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        let digit = i64::from(c - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen_digit.then_some(value)
}
