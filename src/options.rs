use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Normalizations applied while building a tree.
///
/// The default value is the `strict` profile: every option off. A JSON map
/// such as `{"skipEmptyTexts": true}` deserializes into options with the
/// remaining fields at their defaults; unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Drop text made only of spaces, tabs, CR and LF
    pub skip_empty_texts: bool,
    /// Write text nodes as bare strings
    pub text_nodes_to_str: bool,
    /// Store a lone child in place of a one-element content list
    pub extract_only_childs: bool,
    /// Leave out empty attribute maps
    pub omit_empty_attrs: bool,
    /// Leave out empty element content
    pub omit_empty_content: bool,
}

impl Options {
    #[must_use]
    pub fn skip_empty_texts(mut self, on: bool) -> Self {
        self.skip_empty_texts = on;
        self
    }

    #[must_use]
    pub fn text_nodes_to_str(mut self, on: bool) -> Self {
        self.text_nodes_to_str = on;
        self
    }

    #[must_use]
    pub fn extract_only_childs(mut self, on: bool) -> Self {
        self.extract_only_childs = on;
        self
    }

    #[must_use]
    pub fn omit_empty_attrs(mut self, on: bool) -> Self {
        self.omit_empty_attrs = on;
        self
    }

    #[must_use]
    pub fn omit_empty_content(mut self, on: bool) -> Self {
        self.omit_empty_content = on;
        self
    }

    /// Read options given either as a profile name or as a JSON option map.
    pub fn from_arg(arg: &str) -> Result<Options> {
        let arg = arg.trim();
        if arg.starts_with('{') {
            Ok(serde_json::from_str(arg)?)
        } else {
            arg.parse::<Profile>().map(Options::from)
        }
    }
}

/// Named option bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Maximal fidelity, every option off
    #[default]
    Strict,
    /// Whitespace-only texts skipped
    Simple,
    /// Every structural option on. Lossy.
    Compact,
}

impl Profile {
    pub const STRICT: Options = Options {
        skip_empty_texts: false,
        text_nodes_to_str: false,
        extract_only_childs: false,
        omit_empty_attrs: false,
        omit_empty_content: false,
    };

    pub const SIMPLE: Options = Options {
        skip_empty_texts: true,
        ..Profile::STRICT
    };

    pub const COMPACT: Options = Options {
        skip_empty_texts: true,
        text_nodes_to_str: true,
        extract_only_childs: true,
        omit_empty_attrs: true,
        omit_empty_content: true,
    };

    pub fn options(self) -> Options {
        match self {
            Profile::Strict => Profile::STRICT,
            Profile::Simple => Profile::SIMPLE,
            Profile::Compact => Profile::COMPACT,
        }
    }
}

impl From<Profile> for Options {
    fn from(profile: Profile) -> Self {
        profile.options()
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(Profile::Strict),
            "simple" => Ok(Profile::Simple),
            "compact" => Ok(Profile::Compact),
            _ => Err(Error::UnknownProfile(s.to_string())),
        }
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Profile::Strict => "strict",
            Profile::Simple => "simple",
            Profile::Compact => "compact",
        })
    }
}
