//! Parse, output and lookup toggles.
//!
//! [`Settings`] holds the flags that the classic configuration directives
//! set. [`Settings::apply`] accepts those directives by name so a config
//! file reader can feed lines straight through.

use crate::error::SettingsError;
use crate::lexer::CommentMode;

/// How [`render_oid`](crate::Mib::render_oid) prints an OID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OidFormat {
    /// `IF-MIB::ifDescr.1`
    #[default]
    Module,
    /// `ifDescr.1`
    Suffix,
    /// `.iso.org.dod.internet.mgmt.mib-2.interfaces.ifTable.ifEntry.ifDescr.1`
    Full,
    /// `.1.3.6.1.2.1.2.2.1.2.1`
    Numeric,
    /// Full form with the `.iso.org.dod.internet.mgmt.mib-2.` prefix dropped.
    Ucd,
}

impl OidFormat {
    /// Parse a directive value: a name, or the classic numeric code 1-5.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "1" | "module" => Some(Self::Module),
            "2" | "suffix" => Some(Self::Suffix),
            "3" | "full" => Some(Self::Full),
            "4" | "numeric" => Some(Self::Numeric),
            "5" | "ucd" => Some(Self::Ucd),
            _ => None,
        }
    }
}

/// Octet string rendering when no DISPLAY-HINT applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringOutput {
    /// ASCII if every byte is printable, hex otherwise.
    #[default]
    Guess,
    Ascii,
    Hex,
}

/// Registry and formatter configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
    /// 0 logs errors, 1 adds warnings, 2 adds notes.
    pub mib_warnings: u8,
    pub comment_mode: CommentMode,
    /// Let a later module overwrite the metadata of a shared node.
    pub replace_with_latest: bool,
    pub save_descriptions: bool,
    pub oid_format: OidFormat,
    /// Drop type tags, enum numbers and the timeticks raw value.
    pub quick_print: bool,
    pub print_numeric_enums: bool,
    pub dont_print_units: bool,
    pub numeric_timeticks: bool,
    /// Backslash-escape `"` in rendered strings.
    pub escape_quotes: bool,
    /// Render index values as `[a][b]` instead of `.a.b`.
    pub extended_index: bool,
    pub string_output: StringOutput,
    /// Prepended to names that do not resolve as given.
    pub oid_input_prefix: Option<String>,
    /// Appended to every resolved name.
    pub oid_input_suffix: Option<String>,
    /// Resolve bare labels anywhere in the tree (`ifDescr.1`).
    pub random_access: bool,
    /// Resolve names by regular expression best match.
    pub regex_access: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mib_warnings: 0,
            comment_mode: CommentMode::EndOfLine,
            replace_with_latest: false,
            save_descriptions: false,
            oid_format: OidFormat::Module,
            quick_print: false,
            print_numeric_enums: false,
            dont_print_units: false,
            numeric_timeticks: false,
            escape_quotes: false,
            extended_index: false,
            string_output: StringOutput::Guess,
            oid_input_prefix: None,
            oid_input_suffix: None,
            random_access: true,
            regex_access: false,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one `directive value` pair.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let value = value.trim();
        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let flag = || parse_bool(value).ok_or_else(invalid);

        match key {
            "mibWarningLevel" => {
                self.mib_warnings = value.parse::<u8>().map_err(|_| invalid())?.min(2);
            }
            "strictCommentTerm" => {
                self.comment_mode = if flag()? {
                    CommentMode::Strict
                } else {
                    CommentMode::EndOfLine
                };
            }
            "mibReplaceWithLatest" => self.replace_with_latest = flag()?,
            "saveMibDescrs" => self.save_descriptions = flag()?,
            "oidOutputFormat" => {
                self.oid_format = OidFormat::from_name(value).ok_or_else(invalid)?;
            }
            "printNumericOids" => {
                if flag()? {
                    self.oid_format = OidFormat::Numeric;
                } else if self.oid_format == OidFormat::Numeric {
                    self.oid_format = OidFormat::Module;
                }
            }
            "quickPrinting" => self.quick_print = flag()?,
            "printNumericEnums" => self.print_numeric_enums = flag()?,
            "dontPrintUnits" => self.dont_print_units = flag()?,
            "numericTimeticks" => self.numeric_timeticks = flag()?,
            "escapeQuotes" => self.escape_quotes = flag()?,
            "extendedIndex" => self.extended_index = flag()?,
            "stringOutputFormat" => {
                self.string_output = match value.to_ascii_lowercase().as_str() {
                    "guess" => StringOutput::Guess,
                    "ascii" => StringOutput::Ascii,
                    "hex" => StringOutput::Hex,
                    _ => return Err(invalid()),
                };
            }
            "oidInputPrefix" => self.oid_input_prefix = non_empty(value),
            "oidInputSuffix" => self.oid_input_suffix = non_empty(value),
            "randomAccess" => self.random_access = flag()?,
            "regexAccess" => self.regex_access = flag()?,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
