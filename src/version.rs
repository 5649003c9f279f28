//! PEP 440 version parsing for registries that publish versioned tags
//!
//! Accepts the public version forms Python packaging understands: an optional
//! `v`, an `N!` epoch, dot-separated release numbers, `a`/`b`/`rc` pre-releases,
//! `.postN` (or `-N`) post-releases, `.devN` dev releases and a `+local` label.
//! Matching is case-insensitive and the spelling variants (`alpha`, `preview`,
//! `rev`, `-`/`_` separators, implicit `0` numbers) are normalized.

use std::cmp::Ordering;
use std::fmt;

/// A parsed version. Trailing zero release segments do not affect ordering.
#[derive(Debug, Clone)]
pub struct TagVersion {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreKind, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreKind {
    Alpha,
    Beta,
    Rc,
}

impl PreKind {
    fn label(self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::Rc => "rc",
        }
    }
}

/// Local label segment; any number sorts above any text
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalSegment {
    Text(String),
    Number(u64),
}

/// Pre-release slot of the sort key: a bare dev release sorts below every
/// pre-release, a final release above them
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    DevOnly,
    Pre(PreKind, u64),
    Final,
}

/// Dev slot of the sort key: any dev release sorts below the same version without one
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DevKey {
    Dev(u64),
    Final,
}

const PRE_LABELS: [(&str, PreKind); 8] = [
    ("alpha", PreKind::Alpha),
    ("beta", PreKind::Beta),
    ("preview", PreKind::Rc),
    ("pre", PreKind::Rc),
    ("rc", PreKind::Rc),
    ("a", PreKind::Alpha),
    ("b", PreKind::Beta),
    ("c", PreKind::Rc),
];

const POST_LABELS: [&str; 3] = ["post", "rev", "r"];

impl TagVersion {
    pub fn parse(text: &str) -> Result<Self, String> {
        let lower = text.trim().to_ascii_lowercase();
        let body = lower.strip_prefix('v').unwrap_or(&lower);

        let (body, local) = match body.split_once('+') {
            Some((head, label)) => (head, Some(parse_local(label)?)),
            None => (body, None),
        };

        let (epoch, body) = match body.split_once('!') {
            Some((epoch, rest)) => (parse_number(epoch, "epoch")?, rest),
            None => (0, body),
        };

        let (release, rest) = take_release(body)?;

        let (pre, rest) = match take_labelled(rest, &PRE_LABELS) {
            Some((kind, number, rest)) => (Some((kind, number)), rest),
            None => (None, rest),
        };

        let (post, rest) = match take_post(rest) {
            Some((number, rest)) => (Some(number), rest),
            None => (None, rest),
        };

        let (dev, rest) = match take_labelled(rest, &[("dev", ())]) {
            Some(((), number, rest)) => (Some(number), rest),
            None => (None, rest),
        };

        if !rest.is_empty() {
            return Err(format!("unexpected trailing text {rest:?}"));
        }

        Ok(Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn pre(&self) -> Option<(PreKind, u64)> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    fn trimmed_release(&self) -> &[u64] {
        let end = self
            .release
            .iter()
            .rposition(|&segment| segment != 0)
            .map_or(0, |pos| pos + 1);
        &self.release[..end]
    }

    fn pre_key(&self) -> PreKey {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => PreKey::DevOnly,
            (Some((kind, number)), _, _) => PreKey::Pre(kind, number),
            _ => PreKey::Final,
        }
    }

    fn dev_key(&self) -> DevKey {
        self.dev.map_or(DevKey::Final, DevKey::Dev)
    }
}

fn parse_number(segment: &str, what: &str) -> Result<u64, String> {
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid {what} {segment:?}"));
    }
    segment
        .parse()
        .map_err(|e| format!("invalid {what} {segment:?}: {e}"))
}

/// Split leading ASCII digits off `s`
fn take_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | '.')
}

fn strip_separator(s: &str) -> &str {
    s.strip_prefix(is_separator).unwrap_or(s)
}

fn take_release(s: &str) -> Result<(Vec<u64>, &str), String> {
    let mut release = Vec::new();
    let mut rest = s;
    loop {
        let (digits, after) = take_digits(rest);
        release.push(parse_number(digits, "release segment")?);
        rest = after;

        match rest.strip_prefix('.') {
            Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
            _ => return Ok((release, rest)),
        }
    }
}

/// Match `[sep]label[sep][N]`; a missing number means 0
fn take_labelled<'a, K: Copy>(s: &'a str, labels: &[(&str, K)]) -> Option<(K, u64, &'a str)> {
    let s = strip_separator(s);
    let (label, kind) = labels.iter().find(|(label, _)| s.starts_with(label))?;
    let after = &s[label.len()..];

    let (digits, rest) = take_digits(strip_separator(after));
    if digits.is_empty() {
        return Some((*kind, 0, after));
    }
    Some((*kind, digits.parse().ok()?, rest))
}

fn take_post(s: &str) -> Option<(u64, &str)> {
    // Implicit form: `1.0-1`
    if let Some(after) = s.strip_prefix('-') {
        let (digits, rest) = take_digits(after);
        if !digits.is_empty() {
            return Some((digits.parse().ok()?, rest));
        }
    }
    let labels = POST_LABELS.map(|label| (label, ()));
    take_labelled(s, &labels).map(|((), number, rest)| (number, rest))
}

fn parse_local(label: &str) -> Result<Vec<LocalSegment>, String> {
    label
        .split(is_separator)
        .map(|segment| {
            if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
                Err(format!("invalid local version label {label:?}"))
            } else if segment.chars().all(|c| c.is_ascii_digit()) {
                parse_number(segment, "local segment").map(LocalSegment::Number)
            } else {
                Ok(LocalSegment::Text(segment.to_string()))
            }
        })
        .collect()
}

impl PartialEq for TagVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TagVersion {}

impl PartialOrd for TagVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TagVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.trimmed_release().cmp(other.trimmed_release()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((kind, number)) = self.pre {
            write!(f, "{}{}", kind.label(), number)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{post}")?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if let Some(local) = &self.local {
            let segments: Vec<String> = local
                .iter()
                .map(|segment| match segment {
                    LocalSegment::Text(text) => text.clone(),
                    LocalSegment::Number(number) => number.to_string(),
                })
                .collect();
            write!(f, "+{}", segments.join("."))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> TagVersion {
        TagVersion::parse(text).unwrap()
    }

    #[test]
    fn test_parse_release() {
        let version = v("1.2.0");
        assert_eq!(version.release(), &[1, 2, 0]);
        assert_eq!(version.post(), None);
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_leading_v_and_post_forms() {
        assert_eq!(v("v2.0").release(), &[2, 0]);
        assert_eq!(v("2024.11.09-1").post(), Some(1));
        assert_eq!(v("1.0.post3").post(), Some(3));
        assert_eq!(v("1.0-post2").post(), Some(2));
        assert_eq!(v("1.0post4").post(), Some(4));
        assert_eq!(v("1.0.rev5").post(), Some(5));
        assert_eq!(v("1.0.post").post(), Some(0));
    }

    #[test]
    fn test_parse_pre_dev_and_local() {
        assert_eq!(v("1.1.0rc1").pre(), Some((PreKind::Rc, 1)));
        assert_eq!(v("1.0a2").pre(), Some((PreKind::Alpha, 2)));
        assert_eq!(v("1.0-beta.3").pre(), Some((PreKind::Beta, 3)));
        assert_eq!(v("1.0-rc").pre(), Some((PreKind::Rc, 0)));
        assert_eq!(v("1.0.1.dev0").dev(), Some(0));
        assert_eq!(v("1.0RC1").to_string(), "1.0rc1");
        assert_eq!(
            v("1!2.0a1.post2.dev3+Ubuntu-1").to_string(),
            "1!2.0a1.post2.dev3+ubuntu.1"
        );
    }

    #[test]
    fn test_leading_zero_segments_compare_numerically() {
        assert_eq!(v("2024.11.09").release(), &[2024, 11, 9]);
        assert!(v("2024.11.10") > v("2024.11.09"));
    }

    #[test]
    fn test_ordering() {
        assert!(v("1.2.0") > v("1.1.0"));
        assert!(v("1.10.0") > v("1.9.9"));
        assert!(v("1.0.0-1") > v("1.0.0"));
        assert!(v("1.0.0-2") > v("1.0.0-1"));
        assert_eq!(v("1.0"), v("1.0.0"));
        assert!(v("2") > v("1.99"));
    }

    #[test]
    fn test_pep440_ordering_chain() {
        let chain = [
            "1.0.dev0",
            "1.0a1.dev1",
            "1.0a1",
            "1.0b1",
            "1.0rc1",
            "1.0",
            "1.0+abc.5",
            "1.0+abc.6",
            "1.0+1",
            "1.0.post1.dev1",
            "1.0.post1",
            "1.1.dev0",
            "1.1",
            "1!0.1",
        ];
        for pair in chain.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_max_of_list() {
        let max = ["1.0.0", "1.2.0", "1.1.0"]
            .iter()
            .map(|t| v(t))
            .max()
            .unwrap();
        assert_eq!(max.to_string(), "1.2.0");
    }

    #[test]
    fn test_rejects_non_versions() {
        assert!(TagVersion::parse("latest").is_err());
        assert!(TagVersion::parse("").is_err());
        assert!(TagVersion::parse("1..2").is_err());
        assert!(TagVersion::parse("1.0junk").is_err());
        assert!(TagVersion::parse("1.0+").is_err());
        assert!(TagVersion::parse("main-abc123").is_err());
    }
}
