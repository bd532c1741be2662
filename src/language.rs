//! Interned BCP 47 language tags.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;
use rustc_hash::FxHashSet;

use crate::error::ParseError;

lazy_static! {
    static ref LANGUAGES: Mutex<FxHashSet<&'static str>> = Mutex::new(FxHashSet::default());
    static ref DEFAULT_LANGUAGE: Option<Language> = default_from(|name| std::env::var(name).ok());
}

/// Handle to an interned language tag.
///
/// Handles are obtained with [`Language::from_string`]. Interning the same tag twice, from any
/// thread, yields equal handles, so languages can be compared and hashed cheaply.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Language(&'static str);

impl Language {
    /// Intern a language tag.
    ///
    /// The tag is canonicalized first: ASCII letters are lower-cased, `_` becomes `-` and the
    /// tag is cut at the first character that is not a letter, digit or separator. This means
    /// POSIX locale names such as `en_US.UTF-8` intern as `en-us`.
    pub fn from_string(s: &str) -> Result<Language, ParseError> {
        let canonical = canonicalize(s);
        if canonical.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut languages = LANGUAGES.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(&interned) = languages.get(canonical.as_str()) {
            return Ok(Language(interned));
        }
        let interned: &'static str = Box::leak(canonical.into_boxed_str());
        languages.insert(interned);
        Ok(Language(interned))
    }

    /// The language of the process locale, taken from `LC_ALL`, `LC_CTYPE` or `LANG`.
    ///
    /// The environment is read once; later changes to it are not observed.
    pub fn process_default() -> Option<Language> {
        *DEFAULT_LANGUAGE
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Check whether `specific` is this language or a more specific form of it.
    ///
    /// `en` matches `en` and `en-au` but not `eng`.
    pub fn matches(&self, specific: Language) -> bool {
        if *self == specific {
            return true;
        }
        match specific.0.strip_prefix(self.0) {
            Some(rest) => rest.starts_with('-'),
            None => false,
        }
    }
}

fn canonicalize(s: &str) -> String {
    s.chars()
        .map_while(|c| match c {
            'a'..='z' | '0'..='9' | '-' => Some(c),
            'A'..='Z' => Some(c.to_ascii_lowercase()),
            '_' => Some('-'),
            _ => None,
        })
        .collect()
}

/// The language of the first non-empty locale variable found by `lookup`.
fn default_from(lookup: impl Fn(&str) -> Option<String>) -> Option<Language> {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|name| lookup(*name))
        .find(|value| !value.is_empty())
        .and_then(|value| Language::from_string(&value).ok())
}

impl FromStr for Language {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_string(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Language({:?})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod from_string {
        use super::*;

        #[test]
        fn test_interning_is_stable() {
            let first = Language::from_string("en").unwrap();
            let second = Language::from_string("en").unwrap();
            assert_eq!(first, second);
            assert!(std::ptr::eq(first.as_str(), second.as_str()));
        }

        #[test]
        fn test_canonical_forms_are_equal() {
            let a = Language::from_string("pt_BR").unwrap();
            let b = Language::from_string("PT-br").unwrap();
            assert_eq!(a, b);
            assert_eq!(a.as_str(), "pt-br");
        }

        #[test]
        fn test_locale_suffix_is_dropped() {
            let lang = Language::from_string("en_US.UTF-8").unwrap();
            assert_eq!(lang.as_str(), "en-us");
            let lang = Language::from_string("sr_RS@latin").unwrap();
            assert_eq!(lang.as_str(), "sr-rs");
        }

        #[test]
        fn test_empty() {
            assert_eq!(Language::from_string(""), Err(ParseError::Empty));
            assert_eq!(Language::from_string(".UTF-8"), Err(ParseError::Empty));
        }

        #[test]
        fn test_distinct_languages() {
            let en = Language::from_string("en").unwrap();
            let fr = Language::from_string("fr").unwrap();
            assert_ne!(en, fr);
        }

        #[test]
        fn test_interning_across_threads() {
            let here = Language::from_string("ar-eg").unwrap();
            let there = std::thread::spawn(|| Language::from_string("AR_EG").unwrap())
                .join()
                .unwrap();
            assert_eq!(here, there);
        }
    }

    mod matches {
        use super::*;

        #[test]
        fn test_prefix_on_subtag_boundary() {
            let en = Language::from_string("en").unwrap();
            assert!(en.matches(Language::from_string("en").unwrap()));
            assert!(en.matches(Language::from_string("en-AU").unwrap()));
            assert!(!en.matches(Language::from_string("eng").unwrap()));
            assert!(!Language::from_string("en-au").unwrap().matches(en));
        }
    }

    mod default_from {
        use super::*;

        fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
            move |name: &str| {
                vars.iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.to_string())
            }
        }

        #[test]
        fn test_lc_all_wins() {
            let lang = default_from(env(&[("LANG", "fr_FR.UTF-8"), ("LC_ALL", "de_DE")]));
            assert_eq!(lang, Some(Language::from_string("de-de").unwrap()));
        }

        #[test]
        fn test_empty_values_are_skipped() {
            let lang = default_from(env(&[
                ("LC_ALL", ""),
                ("LC_CTYPE", "ja_JP"),
                ("LANG", "fr_FR"),
            ]));
            assert_eq!(lang, Some(Language::from_string("ja-jp").unwrap()));
        }

        #[test]
        fn test_lang_is_canonicalized() {
            let lang = default_from(env(&[("LANG", "en_US.UTF-8")])).unwrap();
            assert_eq!(lang.as_str(), "en-us");
        }

        #[test]
        fn test_unset() {
            assert_eq!(default_from(env(&[])), None);
            assert_eq!(default_from(env(&[("LANG", "")])), None);
        }
    }

    #[test]
    fn test_process_default_is_stable() {
        assert_eq!(Language::process_default(), Language::process_default());
    }
}
