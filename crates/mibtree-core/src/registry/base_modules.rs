//! Built-in SMI base modules.
//!
//! The texts below go through the normal lexer, parser and linker when no
//! module source supplies a file of the same name, so a bare registry can
//! link vendor modules that import from them.

/// SMI base modules shipped with the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseModule {
    /// SNMPv2-SMI (RFC 2578).
    SnmpV2Smi,
    /// SNMPv2-TC (RFC 2579).
    SnmpV2Tc,
    /// SNMPv2-CONF (RFC 2580).
    SnmpV2Conf,
    /// RFC1155-SMI, the SMIv1 base.
    Rfc1155Smi,
    /// RFC-1212, the SMIv1 OBJECT-TYPE macro.
    Rfc1212,
    /// RFC-1215, the SMIv1 TRAP-TYPE macro.
    Rfc1215,
}

impl BaseModule {
    pub const ALL: [Self; 6] = [
        Self::SnmpV2Smi,
        Self::SnmpV2Tc,
        Self::SnmpV2Conf,
        Self::Rfc1155Smi,
        Self::Rfc1212,
        Self::Rfc1215,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SnmpV2Smi => "SNMPv2-SMI",
            Self::SnmpV2Tc => "SNMPv2-TC",
            Self::SnmpV2Conf => "SNMPv2-CONF",
            Self::Rfc1155Smi => "RFC1155-SMI",
            Self::Rfc1212 => "RFC-1212",
            Self::Rfc1215 => "RFC-1215",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub const fn is_smiv2(self) -> bool {
        matches!(self, Self::SnmpV2Smi | Self::SnmpV2Tc | Self::SnmpV2Conf)
    }

    /// Module text.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::SnmpV2Smi => SNMPV2_SMI,
            Self::SnmpV2Tc => SNMPV2_TC,
            Self::SnmpV2Conf => SNMPV2_CONF,
            Self::Rfc1155Smi => RFC1155_SMI,
            Self::Rfc1212 => RFC_1212,
            Self::Rfc1215 => RFC_1215,
        }
    }
}

const SNMPV2_SMI: &str = r#"
SNMPv2-SMI DEFINITIONS ::= BEGIN

org            OBJECT IDENTIFIER ::= { iso 3 }
dod            OBJECT IDENTIFIER ::= { org 6 }
internet       OBJECT IDENTIFIER ::= { dod 1 }
directory      OBJECT IDENTIFIER ::= { internet 1 }
mgmt           OBJECT IDENTIFIER ::= { internet 2 }
mib-2          OBJECT IDENTIFIER ::= { mgmt 1 }
transmission   OBJECT IDENTIFIER ::= { mib-2 10 }
experimental   OBJECT IDENTIFIER ::= { internet 3 }
private        OBJECT IDENTIFIER ::= { internet 4 }
enterprises    OBJECT IDENTIFIER ::= { private 1 }
security       OBJECT IDENTIFIER ::= { internet 5 }
snmpV2         OBJECT IDENTIFIER ::= { internet 6 }
snmpDomains    OBJECT IDENTIFIER ::= { snmpV2 1 }
snmpProxys     OBJECT IDENTIFIER ::= { snmpV2 2 }
snmpModules    OBJECT IDENTIFIER ::= { snmpV2 3 }

MODULE-IDENTITY MACRO ::=
BEGIN
    TYPE NOTATION ::= "LAST-UPDATED" value(Update ExtUTCTime)
                      "ORGANIZATION" Text
                      "CONTACT-INFO" Text
                      "DESCRIPTION" Text
                      RevisionPart
    VALUE NOTATION ::= value(VALUE OBJECT IDENTIFIER)
END

ObjectName ::= OBJECT IDENTIFIER
NotificationName ::= OBJECT IDENTIFIER
ExtUTCTime ::= OCTET STRING (SIZE (11 | 13))

Integer32 ::= INTEGER (-2147483648..2147483647)
IpAddress ::= [APPLICATION 0] IMPLICIT OCTET STRING (SIZE (4))
Counter32 ::= [APPLICATION 1] IMPLICIT INTEGER (0..4294967295)
Gauge32 ::= [APPLICATION 2] IMPLICIT INTEGER (0..4294967295)
Unsigned32 ::= [APPLICATION 2] IMPLICIT INTEGER (0..4294967295)
TimeTicks ::= [APPLICATION 3] IMPLICIT INTEGER (0..4294967295)
Opaque ::= [APPLICATION 4] IMPLICIT OCTET STRING
Counter64 ::= [APPLICATION 6] IMPLICIT INTEGER (0..18446744073709551615)

zeroDotZero OBJECT-IDENTITY
    STATUS current
    DESCRIPTION "A value used for null identifiers."
    ::= { 0 0 }

END
"#;

const SNMPV2_TC: &str = r#"
SNMPv2-TC DEFINITIONS ::= BEGIN

IMPORTS
    TimeTicks FROM SNMPv2-SMI;

DisplayString ::= TEXTUAL-CONVENTION
    DISPLAY-HINT "255a"
    STATUS current
    DESCRIPTION "Represents textual information taken from the NVT ASCII character set."
    SYNTAX OCTET STRING (SIZE (0..255))

PhysAddress ::= TEXTUAL-CONVENTION
    DISPLAY-HINT "1x:"
    STATUS current
    DESCRIPTION "Represents media- or physical-level addresses."
    SYNTAX OCTET STRING

MacAddress ::= TEXTUAL-CONVENTION
    DISPLAY-HINT "1x:"
    STATUS current
    DESCRIPTION "Represents an 802 MAC address in canonical order."
    SYNTAX OCTET STRING (SIZE (6))

TruthValue ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "Represents a boolean value."
    SYNTAX INTEGER { true(1), false(2) }

TestAndIncr ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "Represents integer-valued information used for atomic operations."
    SYNTAX INTEGER (0..2147483647)

AutonomousType ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "Represents an independently extensible type identification value."
    SYNTAX OBJECT IDENTIFIER

InstancePointer ::= TEXTUAL-CONVENTION
    STATUS obsolete
    DESCRIPTION "A pointer to a specific instance of a MIB object."
    SYNTAX OBJECT IDENTIFIER

VariablePointer ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "A pointer to a specific object instance."
    SYNTAX OBJECT IDENTIFIER

RowPointer ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "Represents a pointer to a conceptual row."
    SYNTAX OBJECT IDENTIFIER

RowStatus ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "The RowStatus textual convention is used to manage conceptual rows."
    SYNTAX INTEGER {
        active(1),
        notInService(2),
        notReady(3),
        createAndGo(4),
        createAndWait(5),
        destroy(6)
    }

TimeStamp ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "The value of sysUpTime at which a specific occurrence happened."
    SYNTAX TimeTicks

TimeInterval ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "A period of time, measured in units of 0.01 seconds."
    SYNTAX INTEGER (0..2147483647)

DateAndTime ::= TEXTUAL-CONVENTION
    DISPLAY-HINT "2d-1d-1d,1d:1d:1d.1d,1a1d:1d"
    STATUS current
    DESCRIPTION "A date-time specification."
    SYNTAX OCTET STRING (SIZE (8 | 11))

StorageType ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "Describes the memory realization of a conceptual row."
    SYNTAX INTEGER {
        other(1),
        volatile(2),
        nonVolatile(3),
        permanent(4),
        readOnly(5)
    }

TDomain ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "Denotes a kind of transport service."
    SYNTAX OBJECT IDENTIFIER

TAddress ::= TEXTUAL-CONVENTION
    STATUS current
    DESCRIPTION "Denotes a transport service address."
    SYNTAX OCTET STRING (SIZE (1..255))

END
"#;

const SNMPV2_CONF: &str = r#"
SNMPv2-CONF DEFINITIONS ::= BEGIN

IMPORTS
    ObjectName, NotificationName FROM SNMPv2-SMI;

OBJECT-GROUP MACRO ::=
BEGIN
    TYPE NOTATION ::= ObjectsPart "STATUS" Status "DESCRIPTION" Text ReferPart
    VALUE NOTATION ::= value(VALUE OBJECT IDENTIFIER)
END

END
"#;

const RFC1155_SMI: &str = r#"
RFC1155-SMI DEFINITIONS ::= BEGIN

EXPORTS
    internet, directory, mgmt, experimental, private, enterprises,
    OBJECT-TYPE, ObjectName, ObjectSyntax, SimpleSyntax,
    ApplicationSyntax, NetworkAddress, IpAddress, Counter, Gauge,
    TimeTicks, Opaque;

internet      OBJECT IDENTIFIER ::= { iso org(3) dod(6) 1 }
directory     OBJECT IDENTIFIER ::= { internet 1 }
mgmt          OBJECT IDENTIFIER ::= { internet 2 }
experimental  OBJECT IDENTIFIER ::= { internet 3 }
private       OBJECT IDENTIFIER ::= { internet 4 }
enterprises   OBJECT IDENTIFIER ::= { private 1 }

ObjectName ::= OBJECT IDENTIFIER

NetworkAddress ::= CHOICE { internet IpAddress }
IpAddress ::= [APPLICATION 0] IMPLICIT OCTET STRING (SIZE (4))
Counter ::= [APPLICATION 1] IMPLICIT INTEGER (0..4294967295)
Gauge ::= [APPLICATION 2] IMPLICIT INTEGER (0..4294967295)
TimeTicks ::= [APPLICATION 3] IMPLICIT INTEGER (0..4294967295)
Opaque ::= [APPLICATION 4] IMPLICIT OCTET STRING

END
"#;

const RFC_1212: &str = r#"
RFC-1212 DEFINITIONS ::= BEGIN

IMPORTS
    ObjectName FROM RFC1155-SMI;

OBJECT-TYPE MACRO ::=
BEGIN
    TYPE NOTATION ::= "SYNTAX" type(TYPE ObjectSyntax)
                      "ACCESS" Access
                      "STATUS" Status
                      DescrPart ReferPart IndexPart DefValPart
    VALUE NOTATION ::= value(VALUE ObjectName)
END

END
"#;

const RFC_1215: &str = r#"
RFC-1215 DEFINITIONS ::= BEGIN

IMPORTS
    ObjectName FROM RFC1155-SMI;

TRAP-TYPE MACRO ::=
BEGIN
    TYPE NOTATION ::= "ENTERPRISE" value(enterprise OBJECT IDENTIFIER)
                      VarPart DescrPart ReferPart
    VALUE NOTATION ::= value(VALUE INTEGER)
END

END
"#;
