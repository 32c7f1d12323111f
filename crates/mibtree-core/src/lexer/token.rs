//! Token types and spans.

use super::ByteOffset;

/// Span of source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: ByteOffset,
    /// End byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    #[must_use]
    pub const fn new(start: ByteOffset, end: ByteOffset) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> ByteOffset {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Token with kind, source span and 1-based line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }
}

/// Token kinds.
///
/// Keyword kinds come after every non-keyword kind; `is_keyword` relies on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // === Special ===
    /// End of input.
    Eof = 0,

    // === Identifiers ===
    /// Uppercase identifier (module names, type names).
    UppercaseIdent,
    /// Lowercase identifier (object names, enum labels).
    LowercaseIdent,

    // === Literals ===
    /// Unsigned decimal number.
    Number,
    /// Signed decimal number (negative).
    NegativeNumber,
    /// Quoted string literal.
    QuotedString,
    /// Hex string literal ('...'H). Accepted wherever a number is.
    HexString,
    /// Binary string literal ('...'B). Accepted wherever a number is.
    BinString,

    // === Single-character punctuation ===
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `|`
    Pipe,
    /// `-`
    Minus,

    // === Multi-character operators ===
    /// `..`
    DotDot,
    /// `::=`
    ColonColonEqual,

    // === Structural keywords ===
    /// `DEFINITIONS`
    KwDefinitions,
    /// `BEGIN`
    KwBegin,
    /// `END`
    KwEnd,
    /// `IMPORTS`
    KwImports,
    /// `EXPORTS`
    KwExports,
    /// `FROM`
    KwFrom,
    /// `OBJECT`
    KwObject,
    /// `IDENTIFIER`
    KwIdentifier,
    /// `SEQUENCE`
    KwSequence,
    /// `OF`
    KwOf,
    /// `CHOICE`
    KwChoice,
    /// `MACRO`
    KwMacro,

    // === Clause keywords ===
    /// `SYNTAX`
    KwSyntax,
    /// `MAX-ACCESS`
    KwMaxAccess,
    /// `MIN-ACCESS`
    KwMinAccess,
    /// `ACCESS`
    KwAccess,
    /// `STATUS`
    KwStatus,
    /// `DESCRIPTION`
    KwDescription,
    /// `REFERENCE`
    KwReference,
    /// `INDEX`
    KwIndex,
    /// `DEFVAL`
    KwDefval,
    /// `AUGMENTS`
    KwAugments,
    /// `UNITS`
    KwUnits,
    /// `DISPLAY-HINT`
    KwDisplayHint,
    /// `OBJECTS`
    KwObjects,
    /// `NOTIFICATIONS`
    KwNotifications,
    /// `MODULE`
    KwModule,
    /// `MANDATORY-GROUPS`
    KwMandatoryGroups,
    /// `GROUP`
    KwGroup,
    /// `WRITE-SYNTAX`
    KwWriteSyntax,
    /// `PRODUCT-RELEASE`
    KwProductRelease,
    /// `SUPPORTS`
    KwSupports,
    /// `INCLUDES`
    KwIncludes,
    /// `VARIATION`
    KwVariation,
    /// `CREATION-REQUIRES`
    KwCreationRequires,
    /// `REVISION`
    KwRevision,
    /// `LAST-UPDATED`
    KwLastUpdated,
    /// `ORGANIZATION`
    KwOrganization,
    /// `CONTACT-INFO`
    KwContactInfo,
    /// `IMPLIED`
    KwImplied,
    /// `SIZE`
    KwSize,
    /// `ENTERPRISE`
    KwEnterprise,
    /// `VARIABLES`
    KwVariables,

    // === MACRO invocation keywords ===
    /// `MODULE-IDENTITY`
    KwModuleIdentity,
    /// `MODULE-COMPLIANCE`
    KwModuleCompliance,
    /// `OBJECT-GROUP`
    KwObjectGroup,
    /// `NOTIFICATION-GROUP`
    KwNotificationGroup,
    /// `AGENT-CAPABILITIES`
    KwAgentCapabilities,
    /// `OBJECT-TYPE`
    KwObjectType,
    /// `OBJECT-IDENTITY`
    KwObjectIdentity,
    /// `NOTIFICATION-TYPE`
    KwNotificationType,
    /// `TEXTUAL-CONVENTION`
    KwTextualConvention,
    /// `TRAP-TYPE`
    KwTrapType,

    // === Type keywords ===
    /// `INTEGER`
    KwInteger,
    /// `Integer32`
    KwInteger32,
    /// `Unsigned32`
    KwUnsigned32,
    /// `Counter32`
    KwCounter32,
    /// `Counter64`
    KwCounter64,
    /// `Gauge32`
    KwGauge32,
    /// `IpAddress`
    KwIpAddress,
    /// `Opaque`
    KwOpaque,
    /// `TimeTicks`
    KwTimeTicks,
    /// `BITS`
    KwBits,
    /// `OCTET`
    KwOctet,
    /// `STRING`
    KwString,

    // === SMIv1 type aliases ===
    /// `Counter`.
    KwCounter,
    /// `Gauge`.
    KwGauge,
    /// `NetworkAddress`.
    KwNetworkAddress,
    /// `UInteger32`.
    KwUInteger32,
    /// `NsapAddress`.
    KwNsapAddress,

    // === ASN.1 tag keywords ===
    /// `APPLICATION`
    KwApplication,
    /// `IMPLICIT`
    KwImplicit,
    /// `UNIVERSAL`
    KwUniversal,

    // === Status/Access value keywords ===
    /// `current`
    KwCurrent,
    /// `deprecated`
    KwDeprecated,
    /// `obsolete`
    KwObsolete,
    /// `mandatory` (v1 status).
    KwMandatory,
    /// `optional` (v1 status).
    KwOptional,
    /// `read-only`
    KwReadOnly,
    /// `read-write`
    KwReadWrite,
    /// `read-create`
    KwReadCreate,
    /// `write-only` (deprecated)
    KwWriteOnly,
    /// `not-accessible`
    KwNotAccessible,
    /// `accessible-for-notify`
    KwAccessibleForNotify,
    /// `not-implemented` (AGENT-CAPABILITIES)
    KwNotImplemented,
}

impl TokenKind {
    /// Reserved words, including status and access values.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        self as u8 >= Self::KwDefinitions as u8
    }

    /// Base type keywords usable in a SYNTAX clause.
    #[must_use]
    pub const fn is_type_keyword(self) -> bool {
        matches!(
            self,
            Self::KwInteger
                | Self::KwInteger32
                | Self::KwUnsigned32
                | Self::KwCounter32
                | Self::KwCounter64
                | Self::KwGauge32
                | Self::KwIpAddress
                | Self::KwOpaque
                | Self::KwTimeTicks
                | Self::KwBits
                | Self::KwOctet
                | Self::KwString
                | Self::KwCounter
                | Self::KwGauge
                | Self::KwNetworkAddress
                | Self::KwUInteger32
                | Self::KwNsapAddress
        )
    }

    /// Macro invocation keywords (OBJECT-TYPE and friends).
    #[must_use]
    pub const fn is_macro_keyword(self) -> bool {
        matches!(
            self,
            Self::KwModuleIdentity
                | Self::KwModuleCompliance
                | Self::KwObjectGroup
                | Self::KwNotificationGroup
                | Self::KwAgentCapabilities
                | Self::KwObjectType
                | Self::KwObjectIdentity
                | Self::KwNotificationType
                | Self::KwTextualConvention
                | Self::KwTrapType
        )
    }

    /// Literal kinds that carry a numeric value.
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(self, Self::Number | Self::HexString | Self::BinString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_partition() {
        assert!(TokenKind::KwDefinitions.is_keyword());
        assert!(TokenKind::KwNotImplemented.is_keyword());
        assert!(TokenKind::KwUInteger32.is_keyword());
        assert!(!TokenKind::UppercaseIdent.is_keyword());
        assert!(!TokenKind::ColonColonEqual.is_keyword());
    }

    #[test]
    fn test_number_kinds() {
        assert!(TokenKind::HexString.is_number());
        assert!(!TokenKind::NegativeNumber.is_number());
    }
}
