//! MIB parser.
//!
//! Recursive-descent parser for SMIv1/SMIv2 module text. A file is consumed
//! one module at a time: [`Parser::next_header`] reads the module name and
//! IMPORTS so the registry can load dependencies first, then
//! [`Parser::parse_body`] turns the definitions into [`ParseNode`]s.
//!
//! The parser is lenient. A malformed statement produces an error
//! diagnostic and is dropped; parsing resumes at the next definition.

mod node;

pub use node::*;

use crate::lexer::{
    number_value, CommentMode, Diagnostic, Lexer, Span, Token, TokenKind, MAX_QUOTED_LEN,
};
use crate::model::{
    Access, AsnType, EnumItem, IndexItem, NodeInfo, NodeKind, RangeItem, Status, ROOTS,
};
use crate::tc::TcEntry;

/// One component of an OID value.
#[derive(Clone, Debug, PartialEq, Eq)]
enum OidPart {
    Name(String),
    Number(u32),
    Named(String, u32),
}

/// Resolved SYNTAX clause.
#[derive(Clone, Debug, Default)]
struct Syntax {
    base: AsnType,
    enums: Vec<EnumItem>,
    ranges: Vec<RangeItem>,
    hint: Option<String>,
    tc: Option<String>,
    /// `SEQUENCE OF Entry`.
    table: bool,
}

/// Output of one definition, committed only if the whole statement parsed.
#[derive(Default)]
struct Definition {
    nodes: Vec<ParseNode>,
    tc: Option<TcEntry>,
    references: Vec<ObjectReference>,
}

impl Definition {
    fn nodes(nodes: Vec<ParseNode>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }
}

/// MIB parser over one source file.
pub struct Parser<'src> {
    source: &'src [u8],
    tokens: Vec<Token>,
    pos: usize,
    /// Lexer diagnostics not yet handed to a module, in source order.
    lexer_diagnostics: Vec<Diagnostic>,
    diagnostics: Vec<Diagnostic>,
    /// TCs defined so far by the current module.
    local_tcs: Vec<TcEntry>,
    /// SEQUENCE type names of the current module.
    sequences: Vec<String>,
}

impl<'src> Parser<'src> {
    #[must_use]
    pub fn new(source: &'src [u8], comment_mode: CommentMode) -> Self {
        let (tokens, lexer_diagnostics) = Lexer::new(source)
            .with_comment_mode(comment_mode)
            .tokenize();
        Self {
            source,
            tokens,
            pos: 0,
            lexer_diagnostics,
            diagnostics: Vec::new(),
            local_tcs: Vec::new(),
            sequences: Vec::new(),
        }
    }

    /// Parse the next `Name DEFINITIONS ::= BEGIN IMPORTS ...;` header.
    ///
    /// Returns `None` at end of input. On error the parser skips to the
    /// next module header.
    pub fn next_header(&mut self) -> Option<Result<ModuleHeader, Diagnostic>> {
        if self.is_eof() {
            return None;
        }
        match self.parse_module_header() {
            Ok(header) => Some(Ok(header)),
            Err(diag) => {
                self.skip_to_next_module();
                Some(Err(diag))
            }
        }
    }

    /// Parse definitions up to and including the module's END.
    pub fn parse_body(&mut self, ctx: &mut ParseContext<'_>) -> ParsedModule {
        let mut out = ParsedModule::default();
        self.local_tcs.clear();
        self.sequences.clear();

        loop {
            if self.check(TokenKind::KwEnd) {
                self.advance();
                break;
            }
            if self.is_eof() {
                let diag = self.error("missing END at end of module");
                self.diagnostics.push(diag);
                break;
            }

            let before = self.pos;
            match self.parse_definition(ctx) {
                Ok(def) => {
                    out.nodes.extend(def.nodes);
                    out.references.extend(def.references);
                    if let Some(tc) = def.tc {
                        self.local_tcs.push(tc.clone());
                        out.tcs.push(tc);
                    }
                }
                Err(diag) => {
                    self.diagnostics.push(diag);
                    self.recover_to_definition();
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        let end = self.current_span().start;
        let split = self
            .lexer_diagnostics
            .iter()
            .position(|d| d.span.start >= end)
            .unwrap_or(self.lexer_diagnostics.len());
        let mut diagnostics: Vec<Diagnostic> = self.lexer_diagnostics.drain(..split).collect();
        diagnostics.append(&mut self.diagnostics);
        diagnostics.sort_by_key(|d| d.span.start);
        out.diagnostics = diagnostics;
        out
    }

    // === Token access ===

    fn eof_token(&self) -> Token {
        let end = self.source.len() as u32;
        let line = self.tokens.last().map_or(1, |t| t.line);
        Token::new(TokenKind::Eof, Span::new(end, end), line)
    }

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn peek_nth(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_ident(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::UppercaseIdent | TokenKind::LowercaseIdent
        )
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!(
                "expected {}, found {}",
                kind_name(kind),
                self.found()
            )))
        }
    }

    fn expect_identifier(&mut self) -> Result<Token, Diagnostic> {
        if self.check_ident() {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("expected identifier, found {}", self.found())))
        }
    }

    /// Enumeration labels may collide with keywords (`current`, `optional`).
    fn expect_label(&mut self) -> Result<Token, Diagnostic> {
        if self.check_ident() || self.peek().kind.is_keyword() {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("expected label, found {}", self.found())))
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    fn text(&self, span: Span) -> String {
        let bytes = &self.source[span.start as usize..span.end as usize];
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Description of the current token for error messages.
    fn found(&self) -> String {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            "end of file".to_string()
        } else {
            format!("`{}`", self.text(token.span))
        }
    }

    fn error(&self, message: &str) -> Diagnostic {
        let token = self.peek();
        Diagnostic::error(token.span, token.line, message)
    }

    fn error_at(token: Token, message: &str) -> Diagnostic {
        Diagnostic::error(token.span, token.line, message)
    }

    fn warn_at(&mut self, token: Token, message: String) {
        self.diagnostics
            .push(Diagnostic::warning(token.span, token.line, message));
    }

    /// Value of a numeric literal as a sub-identifier.
    fn subid(&self, token: Token) -> Result<u32, Diagnostic> {
        number_value(token.kind, &self.text(token.span))
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| Self::error_at(token, "sub-identifier out of range"))
    }

    // === Module header ===

    fn parse_module_header(&mut self) -> Result<ModuleHeader, Diagnostic> {
        let name_token = self.expect(TokenKind::UppercaseIdent)?;
        let name = self.text(name_token.span);

        // Optional ASN.1 module OID
        if self.check(TokenKind::LBrace) {
            self.skip_braces()?;
        }

        self.expect(TokenKind::KwDefinitions)?;
        self.expect(TokenKind::ColonColonEqual)?;
        self.expect(TokenKind::KwBegin)?;

        if self.check(TokenKind::KwExports) {
            self.advance();
            if self.check(TokenKind::Semicolon) {
                self.advance();
            }
        }

        let imports = if self.check(TokenKind::KwImports) {
            self.parse_imports()?
        } else {
            Vec::new()
        };

        Ok(ModuleHeader {
            name,
            imports,
            line: name_token.line,
        })
    }

    fn parse_imports(&mut self) -> Result<Vec<ImportClause>, Diagnostic> {
        self.expect(TokenKind::KwImports)?;
        let mut imports = Vec::new();

        loop {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                break;
            }
            if self.is_eof() || self.check(TokenKind::KwEnd) {
                return Err(self.error("unexpected end of IMPORTS"));
            }

            let line = self.peek().line;
            let mut symbols = Vec::new();
            loop {
                let kind = self.peek().kind;
                if kind == TokenKind::KwFrom {
                    break;
                }
                if kind.is_macro_keyword() || kind.is_type_keyword() || self.check_ident() {
                    let token = self.advance();
                    symbols.push(self.text(token.span));
                } else {
                    return Err(self.error(&format!(
                        "expected symbol or FROM in IMPORTS, found {}",
                        self.found()
                    )));
                }
                if self.check(TokenKind::Comma) {
                    self.advance();
                }
            }

            self.expect(TokenKind::KwFrom)?;
            let module_token = self.expect(TokenKind::UppercaseIdent)?;
            if self.check(TokenKind::LBrace) {
                self.skip_braces()?;
            }
            imports.push(ImportClause {
                symbols,
                from: self.text(module_token.span),
                line,
            });
        }

        Ok(imports)
    }

    fn skip_to_next_module(&mut self) {
        while !self.is_eof() {
            if self.check(TokenKind::UppercaseIdent)
                && self.peek_nth(1).kind == TokenKind::KwDefinitions
            {
                break;
            }
            self.advance();
        }
    }

    // === Definitions ===

    fn parse_definition(&mut self, ctx: &mut ParseContext<'_>) -> Result<Definition, Diagnostic> {
        let first = self.peek().kind;
        let second = self.peek_nth(1).kind;

        match (first, second) {
            (TokenKind::LowercaseIdent, TokenKind::KwObject)
                if self.peek_nth(2).kind == TokenKind::KwIdentifier =>
            {
                self.parse_value_assignment(ctx)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwObjectType) => self.parse_object_type(ctx),
            (TokenKind::LowercaseIdent, TokenKind::KwModuleIdentity) => {
                self.parse_module_identity(ctx)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwObjectIdentity) => {
                self.parse_object_identity(ctx)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwNotificationType) => {
                self.parse_notification_type(ctx)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwTrapType) => self.parse_trap_type(ctx),
            (TokenKind::LowercaseIdent, TokenKind::KwObjectGroup) => {
                self.parse_group(ctx, TokenKind::KwObjectGroup, TokenKind::KwObjects)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwNotificationGroup) => {
                self.parse_group(ctx, TokenKind::KwNotificationGroup, TokenKind::KwNotifications)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwModuleCompliance) => {
                self.parse_module_compliance(ctx)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwAgentCapabilities) => {
                self.parse_agent_capabilities(ctx)
            }
            (TokenKind::UppercaseIdent, TokenKind::KwTextualConvention) => {
                let name = self.text(self.peek().span);
                self.advance();
                self.parse_textual_convention(ctx, name)
            }
            (TokenKind::UppercaseIdent, TokenKind::ColonColonEqual) => {
                if self.peek_nth(2).kind == TokenKind::KwTextualConvention {
                    let name = self.text(self.peek().span);
                    self.advance();
                    self.advance();
                    self.parse_textual_convention(ctx, name)
                } else {
                    self.parse_type_assignment(ctx)
                }
            }
            (kind, TokenKind::ColonColonEqual) if kind.is_type_keyword() => {
                self.parse_type_assignment(ctx)
            }
            (kind, TokenKind::KwMacro)
                if kind == TokenKind::UppercaseIdent
                    || kind.is_macro_keyword()
                    || kind.is_type_keyword() =>
            {
                self.parse_macro_definition()
            }
            (TokenKind::KwExports, _) => {
                self.advance();
                if self.check(TokenKind::Semicolon) {
                    self.advance();
                }
                Ok(Definition::default())
            }
            _ => Err(self.error(&format!("unexpected {} at start of definition", self.found()))),
        }
    }

    /// `name OBJECT IDENTIFIER ::= { ... }`
    fn parse_value_assignment(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwObject)?;
        self.expect(TokenKind::KwIdentifier)?;
        self.expect(TokenKind::ColonColonEqual)?;
        let info = NodeInfo {
            kind: NodeKind::Node,
            ..NodeInfo::default()
        };
        let nodes = self.parse_oid_value(ctx, name_token, info)?;
        Ok(Definition::nodes(nodes))
    }

    fn parse_object_type(&mut self, ctx: &mut ParseContext<'_>) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwObjectType)?;

        self.expect(TokenKind::KwSyntax)?;
        let syntax = self.parse_syntax(ctx)?;

        let mut info = NodeInfo {
            kind: NodeKind::Scalar,
            syntax: syntax.base,
            enums: syntax.enums,
            ranges: syntax.ranges,
            hint: syntax.hint,
            tc: syntax.tc,
            ..NodeInfo::default()
        };

        if self.check(TokenKind::KwUnits) {
            self.advance();
            info.units = Some(self.parse_quoted_string()?);
        }

        info.access = self.parse_access_clause()?;

        if !self.check(TokenKind::KwStatus) {
            return Err(self.error(&format!(
                "missing STATUS clause in OBJECT-TYPE, found {}",
                self.found()
            )));
        }
        info.status = self.parse_status_clause()?;

        let mut has_index = false;
        loop {
            match self.peek().kind {
                TokenKind::KwDescription => {
                    self.advance();
                    let text = self.parse_quoted_string()?;
                    if ctx.save_descriptions {
                        info.description = Some(text);
                    }
                }
                TokenKind::KwReference => {
                    self.advance();
                    info.reference = Some(self.parse_quoted_string()?);
                }
                TokenKind::KwIndex => {
                    self.advance();
                    info.indexes = self.parse_index_list()?;
                    has_index = true;
                }
                TokenKind::KwAugments => {
                    self.advance();
                    self.expect(TokenKind::LBrace)?;
                    let target = self.expect_identifier()?;
                    self.expect(TokenKind::RBrace)?;
                    info.augments = Some(self.text(target.span));
                }
                TokenKind::KwDefval => {
                    self.advance();
                    info.defval = Some(self.parse_braced_text()?);
                }
                _ => break,
            }
        }

        if has_index && info.augments.is_some() {
            return Err(Self::error_at(
                name_token,
                &format!(
                    "{} has both INDEX and AUGMENTS",
                    self.text(name_token.span)
                ),
            ));
        }

        info.kind = if syntax.table {
            NodeKind::Table
        } else if has_index || info.augments.is_some() {
            NodeKind::Row
        } else {
            NodeKind::Scalar
        };

        self.expect(TokenKind::ColonColonEqual)?;
        let nodes = self.parse_oid_value(ctx, name_token, info)?;
        Ok(Definition::nodes(nodes))
    }

    fn parse_module_identity(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwModuleIdentity)?;

        let mut info = NodeInfo {
            kind: NodeKind::ModuleIdentity,
            ..NodeInfo::default()
        };
        loop {
            match self.peek().kind {
                TokenKind::KwLastUpdated
                | TokenKind::KwOrganization
                | TokenKind::KwContactInfo
                | TokenKind::KwRevision => {
                    self.advance();
                    self.parse_quoted_string()?;
                }
                TokenKind::KwDescription => {
                    self.advance();
                    let text = self.parse_quoted_string()?;
                    // The first DESCRIPTION belongs to the module; later ones
                    // describe revisions.
                    if ctx.save_descriptions && info.description.is_none() {
                        info.description = Some(text);
                    }
                }
                _ => break,
            }
        }

        self.expect(TokenKind::ColonColonEqual)?;
        let nodes = self.parse_oid_value(ctx, name_token, info)?;
        Ok(Definition::nodes(nodes))
    }

    fn parse_object_identity(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwObjectIdentity)?;

        let mut info = NodeInfo {
            kind: NodeKind::Node,
            ..NodeInfo::default()
        };
        info.status = self.parse_status_clause()?;
        self.parse_description_and_reference(ctx, &mut info)?;

        self.expect(TokenKind::ColonColonEqual)?;
        let nodes = self.parse_oid_value(ctx, name_token, info)?;
        Ok(Definition::nodes(nodes))
    }

    fn parse_notification_type(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwNotificationType)?;

        let mut info = NodeInfo {
            kind: NodeKind::Notification,
            ..NodeInfo::default()
        };
        if self.check(TokenKind::KwObjects) {
            self.advance();
            info.varbinds = self.parse_braced_identifiers()?;
        }
        info.status = self.parse_status_clause()?;
        self.parse_description_and_reference(ctx, &mut info)?;

        self.expect(TokenKind::ColonColonEqual)?;
        let nodes = self.parse_oid_value(ctx, name_token, info)?;
        Ok(Definition::nodes(nodes))
    }

    /// SMIv1 TRAP-TYPE.
    ///
    /// A trap `n` of enterprise `e` lives at `e.0.n`, so two nodes come
    /// out: the placeholder `e#` at `e.0` and the trap itself under it.
    fn parse_trap_type(&mut self, ctx: &mut ParseContext<'_>) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwTrapType)?;

        self.expect(TokenKind::KwEnterprise)?;
        let braced = self.check(TokenKind::LBrace);
        if braced {
            self.advance();
        }
        let enterprise_token = self.expect_identifier()?;
        let enterprise = self.text(enterprise_token.span);
        if braced {
            self.expect(TokenKind::RBrace)?;
        }

        let mut info = NodeInfo {
            kind: NodeKind::Notification,
            ..NodeInfo::default()
        };
        if self.check(TokenKind::KwVariables) {
            self.advance();
            info.varbinds = self.parse_braced_identifiers()?;
        }
        self.parse_description_and_reference(ctx, &mut info)?;

        self.expect(TokenKind::ColonColonEqual)?;
        let number_token = self.peek();
        if !number_token.kind.is_number() {
            return Err(self.error(&format!(
                "expected trap number, found {}",
                self.found()
            )));
        }
        self.advance();
        let trap_number = self.subid(number_token)?;

        let placeholder = format!("{enterprise}#");
        Ok(Definition::nodes(vec![
            ParseNode {
                label: placeholder.clone(),
                subid: Some(0),
                module: ctx.module,
                parent: enterprise,
                info: NodeInfo::default(),
                line: name_token.line,
            },
            ParseNode {
                label: self.text(name_token.span),
                subid: Some(trap_number),
                module: ctx.module,
                parent: placeholder,
                info,
                line: name_token.line,
            },
        ]))
    }

    /// OBJECT-GROUP or NOTIFICATION-GROUP.
    fn parse_group(
        &mut self,
        ctx: &mut ParseContext<'_>,
        keyword: TokenKind,
        members_keyword: TokenKind,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(keyword)?;

        self.expect(members_keyword)?;
        let members_line = self.peek().line;
        let members = self.parse_braced_identifiers()?;

        let mut info = NodeInfo {
            kind: NodeKind::Group,
            ..NodeInfo::default()
        };
        info.status = self.parse_status_clause()?;
        self.parse_description_and_reference(ctx, &mut info)?;

        self.expect(TokenKind::ColonColonEqual)?;
        let nodes = self.parse_oid_value(ctx, name_token, info)?;

        let references = members
            .into_iter()
            .map(|name| ObjectReference {
                name,
                module: None,
                site: ReferenceSite::Group,
                line: members_line,
            })
            .collect();
        Ok(Definition {
            nodes,
            tc: None,
            references,
        })
    }

    fn parse_module_compliance(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwModuleCompliance)?;

        let mut info = NodeInfo {
            kind: NodeKind::Compliance,
            ..NodeInfo::default()
        };
        info.status = self.parse_status_clause()?;
        self.parse_description_and_reference(ctx, &mut info)?;

        let mut references = Vec::new();
        while self.check(TokenKind::KwModule) {
            self.parse_compliance_module(ctx, &mut references)?;
        }

        self.expect(TokenKind::ColonColonEqual)?;
        let nodes = self.parse_oid_value(ctx, name_token, info)?;
        Ok(Definition {
            nodes,
            tc: None,
            references,
        })
    }

    /// `MODULE [Name] MANDATORY-GROUPS {..} GROUP g .. OBJECT o ..`
    fn parse_compliance_module(
        &mut self,
        ctx: &mut ParseContext<'_>,
        references: &mut Vec<ObjectReference>,
    ) -> Result<(), Diagnostic> {
        self.expect(TokenKind::KwModule)?;

        let module = if self.check(TokenKind::UppercaseIdent) {
            let token = self.advance();
            Some(self.text(token.span))
        } else {
            None
        };
        if self.check(TokenKind::LBrace) {
            self.skip_braces()?;
        }

        if self.check(TokenKind::KwMandatoryGroups) {
            self.advance();
            let line = self.peek().line;
            for name in self.parse_braced_identifiers()? {
                references.push(ObjectReference {
                    name,
                    module: module.clone(),
                    site: ReferenceSite::Compliance,
                    line,
                });
            }
        }

        loop {
            let keyword = self.peek().kind;
            if keyword != TokenKind::KwGroup && keyword != TokenKind::KwObject {
                break;
            }
            self.advance();
            let target = self.expect_identifier()?;
            references.push(ObjectReference {
                name: self.text(target.span),
                module: module.clone(),
                site: ReferenceSite::Compliance,
                line: target.line,
            });

            if keyword == TokenKind::KwObject {
                if self.check(TokenKind::KwSyntax) {
                    self.advance();
                    self.parse_syntax(ctx)?;
                }
                if self.check(TokenKind::KwWriteSyntax) {
                    self.advance();
                    self.parse_syntax(ctx)?;
                }
                if self.check(TokenKind::KwMinAccess) {
                    self.parse_access_clause()?;
                }
            }

            self.expect(TokenKind::KwDescription)?;
            self.parse_quoted_string()?;
        }

        Ok(())
    }

    fn parse_agent_capabilities(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwAgentCapabilities)?;

        self.expect(TokenKind::KwProductRelease)?;
        self.parse_quoted_string()?;

        let mut info = NodeInfo {
            kind: NodeKind::Capabilities,
            ..NodeInfo::default()
        };
        info.status = self.parse_status_clause()?;
        self.parse_description_and_reference(ctx, &mut info)?;

        let mut references = Vec::new();
        while self.check(TokenKind::KwSupports) {
            self.parse_supports_module(ctx, &mut references)?;
        }

        self.expect(TokenKind::ColonColonEqual)?;
        let nodes = self.parse_oid_value(ctx, name_token, info)?;
        Ok(Definition {
            nodes,
            tc: None,
            references,
        })
    }

    /// `SUPPORTS Module INCLUDES {..} VARIATION ..`
    fn parse_supports_module(
        &mut self,
        ctx: &mut ParseContext<'_>,
        references: &mut Vec<ObjectReference>,
    ) -> Result<(), Diagnostic> {
        self.expect(TokenKind::KwSupports)?;
        let module_token = self.expect_identifier()?;
        let module = Some(self.text(module_token.span));
        if self.check(TokenKind::LBrace) {
            self.skip_braces()?;
        }

        self.expect(TokenKind::KwIncludes)?;
        let line = self.peek().line;
        for name in self.parse_braced_identifiers()? {
            references.push(ObjectReference {
                name,
                module: module.clone(),
                site: ReferenceSite::Capabilities,
                line,
            });
        }

        while self.check(TokenKind::KwVariation) {
            self.advance();
            let target = self.expect_identifier()?;
            references.push(ObjectReference {
                name: self.text(target.span),
                module: module.clone(),
                site: ReferenceSite::Capabilities,
                line: target.line,
            });

            if self.check(TokenKind::KwSyntax) {
                self.advance();
                self.parse_syntax(ctx)?;
            }
            if self.check(TokenKind::KwWriteSyntax) {
                self.advance();
                self.parse_syntax(ctx)?;
            }
            if self.check(TokenKind::KwAccess) {
                self.parse_access_clause()?;
            }
            if self.check(TokenKind::KwCreationRequires) {
                self.advance();
                self.parse_braced_identifiers()?;
            }
            if self.check(TokenKind::KwDefval) {
                self.advance();
                self.parse_braced_text()?;
            }
            self.expect(TokenKind::KwDescription)?;
            self.parse_quoted_string()?;
        }

        Ok(())
    }

    /// Body of `Name TEXTUAL-CONVENTION` after the name and keyword prefix.
    fn parse_textual_convention(
        &mut self,
        ctx: &mut ParseContext<'_>,
        name: String,
    ) -> Result<Definition, Diagnostic> {
        self.expect(TokenKind::KwTextualConvention)?;

        let hint = if self.check(TokenKind::KwDisplayHint) {
            self.advance();
            Some(self.parse_quoted_string()?)
        } else {
            None
        };

        self.parse_status_clause()?;
        let mut info = NodeInfo::default();
        self.parse_description_and_reference(ctx, &mut info)?;

        self.expect(TokenKind::KwSyntax)?;
        let syntax = self.parse_syntax(ctx)?;

        Ok(Definition {
            tc: Some(TcEntry {
                name,
                module: ctx.module,
                base: syntax.base,
                hint: hint.or(syntax.hint),
                enums: syntax.enums,
                ranges: syntax.ranges,
                description: info.description,
            }),
            ..Definition::default()
        })
    }

    /// `Name ::= Syntax`. SEQUENCE types only record their name; assignments
    /// to builtin type names and CHOICE types are parsed and dropped.
    fn parse_type_assignment(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        let name = self.text(name_token.span);
        self.expect(TokenKind::ColonColonEqual)?;

        if self.check(TokenKind::KwChoice) {
            self.advance();
            self.expect(TokenKind::RBrace)?;
            return Ok(Definition::default());
        }

        if self.check(TokenKind::KwSequence) && self.peek_nth(1).kind == TokenKind::LBrace {
            self.advance();
            self.skip_braces()?;
            self.sequences.push(name);
            return Ok(Definition::default());
        }

        let syntax = self.parse_syntax(ctx)?;
        if name_token.kind != TokenKind::UppercaseIdent {
            return Ok(Definition::default());
        }

        Ok(Definition {
            tc: Some(TcEntry {
                name,
                module: ctx.module,
                base: syntax.base,
                hint: syntax.hint,
                enums: syntax.enums,
                ranges: syntax.ranges,
                description: None,
            }),
            ..Definition::default()
        })
    }

    /// The lexer has already skipped the body; only `Name MACRO END` remains.
    fn parse_macro_definition(&mut self) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        self.expect(TokenKind::KwMacro)?;
        let end_token = self.expect(TokenKind::KwEnd)?;
        self.diagnostics.push(Diagnostic::note(
            Span::new(name_token.span.start, end_token.span.end),
            name_token.line,
            format!(
                "MACRO {} skipped (lines {}-{})",
                self.text(name_token.span),
                name_token.line,
                end_token.line
            ),
        ));
        Ok(Definition::default())
    }

    // === Clauses ===

    /// Resolve a SYNTAX type, following textual conventions to their base.
    fn parse_syntax(&mut self, ctx: &ParseContext<'_>) -> Result<Syntax, Diagnostic> {
        // [APPLICATION n] IMPLICIT
        if self.check(TokenKind::LBracket) {
            while !self.check(TokenKind::RBracket) && !self.is_eof() {
                self.advance();
            }
            self.expect(TokenKind::RBracket)?;
        }
        if self.check(TokenKind::KwImplicit) {
            self.advance();
        }

        let token = self.peek();
        let mut syntax = Syntax::default();
        match token.kind {
            TokenKind::KwObject => {
                self.advance();
                self.expect(TokenKind::KwIdentifier)?;
                syntax.base = AsnType::ObjectId;
                return Ok(syntax);
            }
            TokenKind::KwOctet => {
                self.advance();
                self.expect(TokenKind::KwString)?;
                syntax.base = AsnType::OctetString;
            }
            TokenKind::KwSequence => {
                self.advance();
                self.expect(TokenKind::KwOf)?;
                self.expect_identifier()?;
                syntax.table = true;
                return Ok(syntax);
            }
            TokenKind::KwBits => {
                self.advance();
                syntax.base = AsnType::Bits;
            }
            kind if kind.is_type_keyword() => {
                self.advance();
                syntax.base = keyword_type(kind);
            }
            TokenKind::UppercaseIdent => {
                self.advance();
                let name = self.text(token.span);
                if name == "NULL" {
                    syntax.base = AsnType::Null;
                    return Ok(syntax);
                }
                let local = self.local_tcs.iter().rev().find(|tc| tc.name == name);
                if let Some(tc) = local.or_else(|| ctx.lookup_tc(&name)) {
                    syntax.base = tc.base;
                    syntax.hint = tc.hint.clone();
                    syntax.enums = tc.enums.clone();
                    syntax.ranges = tc.ranges.clone();
                    syntax.tc = Some(name);
                } else if !self.sequences.contains(&name) {
                    self.warn_at(token, format!("unknown type {name}"));
                }
            }
            _ => {
                return Err(self.error(&format!("expected type, found {}", self.found())));
            }
        }

        if self.check(TokenKind::LBrace) {
            syntax.enums = self.parse_named_number_list()?;
        } else if self.check(TokenKind::LParen) {
            syntax.ranges = self.parse_constraint()?;
        }
        Ok(syntax)
    }

    /// `{ label(n), ... }`
    fn parse_named_number_list(&mut self) -> Result<Vec<EnumItem>, Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();

        loop {
            if self.check(TokenKind::RBrace) {
                break;
            }
            let label_token = self.expect_label()?;
            self.expect(TokenKind::LParen)?;
            let value = self.parse_range_value()?;
            self.expect(TokenKind::RParen)?;
            items.push(EnumItem::new(self.text(label_token.span), value));

            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(items)
    }

    /// `(SIZE (a..b | c))` or `(a..b | c)`.
    fn parse_constraint(&mut self) -> Result<Vec<RangeItem>, Diagnostic> {
        self.expect(TokenKind::LParen)?;
        let ranges = if self.check(TokenKind::KwSize) {
            self.advance();
            self.expect(TokenKind::LParen)?;
            let ranges = self.parse_range_list()?;
            self.expect(TokenKind::RParen)?;
            ranges
        } else {
            self.parse_range_list()?
        };
        self.expect(TokenKind::RParen)?;
        Ok(ranges)
    }

    fn parse_range_list(&mut self) -> Result<Vec<RangeItem>, Diagnostic> {
        let mut ranges = Vec::new();
        loop {
            let low = self.parse_range_value()?;
            let high = if self.check(TokenKind::DotDot) {
                self.advance();
                self.parse_range_value()?
            } else {
                low
            };
            ranges.push(RangeItem::new(low, high));

            if self.check(TokenKind::Pipe) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(ranges)
    }

    /// A range bound. `MIN`/`MAX` map to the i64 extremes and values past
    /// `i64::MAX` saturate.
    fn parse_range_value(&mut self) -> Result<i64, Diagnostic> {
        let token = self.peek();
        let text = self.text(token.span);
        let value = match token.kind {
            TokenKind::NegativeNumber => text.parse::<i64>().unwrap_or(i64::MIN),
            kind if kind.is_number() => {
                let value = number_value(kind, &text)
                    .ok_or_else(|| Self::error_at(token, "number out of range"))?;
                i64::try_from(value).unwrap_or(i64::MAX)
            }
            TokenKind::UppercaseIdent | TokenKind::LowercaseIdent
                if text.eq_ignore_ascii_case("MIN") =>
            {
                i64::MIN
            }
            TokenKind::UppercaseIdent | TokenKind::LowercaseIdent
                if text.eq_ignore_ascii_case("MAX") =>
            {
                i64::MAX
            }
            _ => {
                return Err(self.error(&format!("expected number, found {}", self.found())));
            }
        };
        self.advance();
        Ok(value)
    }

    fn parse_access_clause(&mut self) -> Result<Access, Diagnostic> {
        match self.peek().kind {
            TokenKind::KwAccess | TokenKind::KwMaxAccess | TokenKind::KwMinAccess => {
                self.advance();
            }
            _ => {
                return Err(self.error(&format!(
                    "expected ACCESS or MAX-ACCESS, found {}",
                    self.found()
                )));
            }
        }

        let access = match self.peek().kind {
            TokenKind::KwReadOnly => Access::ReadOnly,
            TokenKind::KwReadWrite => Access::ReadWrite,
            TokenKind::KwReadCreate => Access::ReadCreate,
            TokenKind::KwWriteOnly => Access::WriteOnly,
            TokenKind::KwNotAccessible => Access::NotAccessible,
            TokenKind::KwAccessibleForNotify => Access::AccessibleForNotify,
            TokenKind::KwNotImplemented => Access::NotImplemented,
            _ => {
                return Err(self.error(&format!("invalid access value {}", self.found())));
            }
        };
        self.advance();
        Ok(access)
    }

    fn parse_status_clause(&mut self) -> Result<Status, Diagnostic> {
        self.expect(TokenKind::KwStatus)?;
        let status = match self.peek().kind {
            TokenKind::KwCurrent => Status::Current,
            TokenKind::KwDeprecated => Status::Deprecated,
            TokenKind::KwObsolete => Status::Obsolete,
            TokenKind::KwMandatory => Status::Mandatory,
            TokenKind::KwOptional => Status::Optional,
            _ => {
                return Err(self.error(&format!("invalid status value {}", self.found())));
            }
        };
        self.advance();
        Ok(status)
    }

    /// Optional `DESCRIPTION ".."` then optional `REFERENCE ".."`.
    fn parse_description_and_reference(
        &mut self,
        ctx: &ParseContext<'_>,
        info: &mut NodeInfo,
    ) -> Result<(), Diagnostic> {
        if self.check(TokenKind::KwDescription) {
            self.advance();
            let text = self.parse_quoted_string()?;
            if ctx.save_descriptions {
                info.description = Some(text);
            }
        }
        if self.check(TokenKind::KwReference) {
            self.advance();
            info.reference = Some(self.parse_quoted_string()?);
        }
        Ok(())
    }

    /// `{ [IMPLIED] name, ... }`
    fn parse_index_list(&mut self) -> Result<Vec<IndexItem>, Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();
        loop {
            if self.check(TokenKind::RBrace) {
                break;
            }
            let implied = self.check(TokenKind::KwImplied);
            if implied {
                self.advance();
            }
            // Some SMIv1 modules index by a bare type keyword
            let token = if self.peek().kind.is_type_keyword() {
                self.advance()
            } else {
                self.expect_identifier()?
            };
            items.push(IndexItem::new(self.text(token.span), implied));
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(items)
    }

    fn parse_braced_identifiers(&mut self) -> Result<Vec<String>, Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut names = Vec::new();
        loop {
            if self.check(TokenKind::RBrace) {
                break;
            }
            let token = self.expect_identifier()?;
            names.push(self.text(token.span));
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(names)
    }

    /// Text of a `{ ... }` DEFVAL body, tokens joined by single spaces.
    fn parse_braced_text(&mut self) -> Result<String, Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return Err(self.error("unterminated DEFVAL")),
                TokenKind::RBrace if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.advance();
            let piece = self.text(token.span);
            let glue = matches!(token.kind, TokenKind::Comma | TokenKind::RParen)
                || text.ends_with('(');
            if !text.is_empty() && !glue {
                text.push(' ');
            }
            text.push_str(&piece);
        }
        Ok(text)
    }

    fn parse_quoted_string(&mut self) -> Result<String, Diagnostic> {
        let token = self.expect(TokenKind::QuotedString)?;
        let raw = self.text(token.span);
        let inner = raw.strip_prefix('"').unwrap_or(&raw);
        let inner = inner.strip_suffix('"').unwrap_or(inner);
        let mut value = inner.to_string();
        if value.len() > MAX_QUOTED_LEN {
            let mut cut = MAX_QUOTED_LEN;
            while !value.is_char_boundary(cut) {
                cut -= 1;
            }
            value.truncate(cut);
        }
        Ok(value)
    }

    /// Skip a balanced `{ ... }` group.
    fn skip_braces(&mut self) -> Result<(), Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => return Err(self.error("unbalanced braces")),
                _ => {}
            }
        }
        Ok(())
    }

    // === OID values ===

    /// Parse `{ parent [name(n) | n]... n }` into the defined node plus any
    /// intermediate nodes the value introduces.
    fn parse_oid_value(
        &mut self,
        ctx: &mut ParseContext<'_>,
        name_token: Token,
        info: NodeInfo,
    ) -> Result<Vec<ParseNode>, Diagnostic> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut parts = Vec::new();
        while !self.check(TokenKind::RBrace) {
            parts.push(self.parse_oid_part()?);
        }
        self.expect(TokenKind::RBrace)?;

        let label = self.text(name_token.span);
        if parts.len() < 2 {
            return Err(Self::error_at(
                open,
                &format!("OID value of {label} needs a parent and a sub-identifier"),
            ));
        }

        let mut parent = match &parts[0] {
            OidPart::Name(name) | OidPart::Named(name, _) => name.clone(),
            OidPart::Number(arc) => ROOTS
                .iter()
                .find(|(_, subid)| subid == arc)
                .map(|(root, _)| (*root).to_string())
                .ok_or_else(|| {
                    Self::error_at(open, &format!("no top-level arc {arc} in OID of {label}"))
                })?,
        };

        let line = name_token.line;
        let mut nodes = Vec::new();
        let last = parts.len() - 1;
        for part in &parts[1..last] {
            let (child, subid) = match part {
                OidPart::Named(name, subid) => (name.clone(), *subid),
                OidPart::Number(subid) => (ctx.next_anonymous(), *subid),
                OidPart::Name(name) => {
                    return Err(Self::error_at(
                        open,
                        &format!("missing sub-identifier for {name} in OID of {label}"),
                    ));
                }
            };
            nodes.push(ParseNode {
                label: child.clone(),
                subid: Some(subid),
                module: ctx.module,
                parent,
                info: NodeInfo::default(),
                line,
            });
            parent = child;
        }

        let subid = match &parts[last] {
            OidPart::Number(subid) | OidPart::Named(_, subid) => *subid,
            OidPart::Name(name) => {
                return Err(Self::error_at(
                    open,
                    &format!("OID of {label} ends in {name} without a sub-identifier"),
                ));
            }
        };
        nodes.push(ParseNode {
            label,
            subid: Some(subid),
            module: ctx.module,
            parent,
            info,
            line,
        });
        Ok(nodes)
    }

    fn parse_oid_part(&mut self) -> Result<OidPart, Diagnostic> {
        let token = self.peek();
        if token.kind.is_number() {
            self.advance();
            return Ok(OidPart::Number(self.subid(token)?));
        }

        let mut name_token = self.expect_identifier()?;
        // Module.name
        if self.check(TokenKind::Dot)
            && matches!(
                self.peek_nth(1).kind,
                TokenKind::LowercaseIdent | TokenKind::UppercaseIdent
            )
        {
            self.advance();
            name_token = self.advance();
        }
        let name = self.text(name_token.span);

        if self.check(TokenKind::LParen) {
            self.advance();
            let number = self.peek();
            if !number.kind.is_number() {
                return Err(self.error(&format!(
                    "expected number after {name}(, found {}",
                    self.found()
                )));
            }
            self.advance();
            let subid = self.subid(number)?;
            self.expect(TokenKind::RParen)?;
            Ok(OidPart::Named(name, subid))
        } else {
            Ok(OidPart::Name(name))
        }
    }

    // === Recovery ===

    /// Skip to the next token pair that starts a definition.
    fn recover_to_definition(&mut self) {
        loop {
            if self.is_eof() || self.check(TokenKind::KwEnd) {
                break;
            }

            let current = self.peek().kind;
            let next = self.peek_nth(1).kind;
            if (current == TokenKind::LowercaseIdent && next.is_macro_keyword())
                || (current == TokenKind::UppercaseIdent && next == TokenKind::ColonColonEqual)
                || (current == TokenKind::UppercaseIdent
                    && next == TokenKind::KwTextualConvention)
                || (current == TokenKind::LowercaseIdent
                    && next == TokenKind::KwObject
                    && self.peek_nth(2).kind == TokenKind::KwIdentifier)
            {
                break;
            }
            self.advance();
        }
    }
}

fn keyword_type(kind: TokenKind) -> AsnType {
    match kind {
        TokenKind::KwInteger => AsnType::Integer,
        TokenKind::KwInteger32 => AsnType::Integer32,
        TokenKind::KwUnsigned32 => AsnType::Unsigned32,
        TokenKind::KwCounter32 | TokenKind::KwCounter => AsnType::Counter,
        TokenKind::KwCounter64 => AsnType::Counter64,
        TokenKind::KwGauge32 | TokenKind::KwGauge => AsnType::Gauge,
        TokenKind::KwIpAddress => AsnType::IpAddress,
        TokenKind::KwOpaque => AsnType::Opaque,
        TokenKind::KwTimeTicks => AsnType::TimeTicks,
        TokenKind::KwBits => AsnType::Bits,
        TokenKind::KwNetworkAddress => AsnType::NetAddress,
        TokenKind::KwUInteger32 => AsnType::UInteger,
        TokenKind::KwNsapAddress => AsnType::NsapAddress,
        TokenKind::KwOctet | TokenKind::KwString => AsnType::OctetString,
        _ => AsnType::Other,
    }
}

fn kind_name(kind: TokenKind) -> String {
    let literal = match kind {
        TokenKind::LBrace => "`{`",
        TokenKind::RBrace => "`}`",
        TokenKind::LParen => "`(`",
        TokenKind::RParen => "`)`",
        TokenKind::LBracket => "`[`",
        TokenKind::RBracket => "`]`",
        TokenKind::ColonColonEqual => "`::=`",
        TokenKind::Comma => "`,`",
        TokenKind::Semicolon => "`;`",
        TokenKind::QuotedString => "quoted string",
        TokenKind::UppercaseIdent => "uppercase identifier",
        TokenKind::LowercaseIdent => "identifier",
        TokenKind::Number => "number",
        _ => return format!("{kind:?}").trim_start_matches("Kw").to_uppercase(),
    };
    literal.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Severity;
    use crate::model::ModuleId;
    use crate::tc::TcTable;

    fn parse_with(source: &str, tcs: &TcTable) -> (ModuleHeader, ParsedModule) {
        let mut anonymous = 0;
        let mut parser = Parser::new(source.as_bytes(), CommentMode::EndOfLine);
        let header = parser.next_header().unwrap().unwrap();
        let mut ctx = ParseContext {
            module: ModuleId::from_raw(1).unwrap(),
            imports: &[],
            tcs,
            save_descriptions: true,
            anonymous: &mut anonymous,
        };
        let body = parser.parse_body(&mut ctx);
        (header, body)
    }

    fn parse(source: &str) -> ParsedModule {
        parse_with(source, &TcTable::new()).1
    }

    fn node<'a>(module: &'a ParsedModule, label: &str) -> &'a ParseNode {
        module
            .nodes
            .iter()
            .find(|n| n.label == label)
            .unwrap_or_else(|| panic!("no node {label}"))
    }

    #[test]
    fn test_header_and_imports() {
        let (header, body) = parse_with(
            "TEST-MIB DEFINITIONS ::= BEGIN
             IMPORTS
                 OBJECT-TYPE, Integer32 FROM SNMPv2-SMI
                 DisplayString FROM SNMPv2-TC;
             END",
            &TcTable::new(),
        );
        assert_eq!(header.name, "TEST-MIB");
        assert_eq!(header.imports.len(), 2);
        assert_eq!(header.imports[0].symbols, vec!["OBJECT-TYPE", "Integer32"]);
        assert_eq!(header.imports[0].from, "SNMPv2-SMI");
        assert_eq!(header.imports[1].from, "SNMPv2-TC");
        assert!(body.nodes.is_empty());
        assert_eq!(body.error_count(), 0);
    }

    #[test]
    fn test_value_assignment_with_named_intermediates() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             internet OBJECT IDENTIFIER ::= { iso org(3) dod(6) 1 }
             END",
        );
        assert_eq!(body.nodes.len(), 3);
        assert_eq!(node(&body, "org").parent, "iso");
        assert_eq!(node(&body, "dod").parent, "org");
        let internet = node(&body, "internet");
        assert_eq!(internet.parent, "dod");
        assert_eq!(internet.subid, Some(1));
        assert_eq!(internet.info.kind, NodeKind::Node);
    }

    #[test]
    fn test_numeric_oid_is_relabelled_to_root() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             org OBJECT IDENTIFIER ::= { 1 3 }
             END",
        );
        let org = node(&body, "org");
        assert_eq!(org.parent, "iso");
        assert_eq!(org.subid, Some(3));
    }

    #[test]
    fn test_bare_intermediate_numbers_become_anonymous() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             acme OBJECT IDENTIFIER ::= { enterprises 9 9 42 }
             END",
        );
        assert_eq!(body.nodes.len(), 3);
        assert_eq!(body.nodes[0].label, "anonymous#1");
        assert_eq!(body.nodes[0].parent, "enterprises");
        assert_eq!(body.nodes[1].label, "anonymous#2");
        assert_eq!(body.nodes[1].parent, "anonymous#1");
        assert_eq!(node(&body, "acme").parent, "anonymous#2");
        assert_eq!(node(&body, "acme").subid, Some(42));
    }

    #[test]
    fn test_short_oid_is_error() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             bad OBJECT IDENTIFIER ::= { 7 }
             good OBJECT IDENTIFIER ::= { iso 3 }
             END",
        );
        assert_eq!(body.error_count(), 1);
        assert!(!body.defines("bad"));
        assert!(body.defines("good"));
    }

    #[test]
    fn test_object_type_clauses_in_any_order() {
        let body = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
             ifEntry OBJECT-TYPE
                 SYNTAX IfEntry
                 MAX-ACCESS not-accessible
                 STATUS current
                 INDEX { ifIndex }
                 REFERENCE "RFC 2863"
                 DESCRIPTION "An interface entry."
                 ::= { ifTable 1 }
             END"#,
        );
        assert_eq!(body.error_count(), 0);
        let entry = node(&body, "ifEntry");
        assert_eq!(entry.info.kind, NodeKind::Row);
        assert_eq!(entry.info.indexes, vec![IndexItem::new("ifIndex", false)]);
        assert_eq!(entry.info.reference.as_deref(), Some("RFC 2863"));
        assert_eq!(entry.info.description.as_deref(), Some("An interface entry."));
    }

    #[test]
    fn test_object_type_enums_units_defval() {
        let body = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
             ifAdminStatus OBJECT-TYPE
                 SYNTAX INTEGER { up(1), down(2), testing(3) }
                 UNITS "state"
                 MAX-ACCESS read-write
                 STATUS current
                 DEFVAL { up }
                 ::= { ifEntry 7 }
             END"#,
        );
        let admin = node(&body, "ifAdminStatus");
        assert_eq!(admin.info.kind, NodeKind::Scalar);
        assert_eq!(admin.info.syntax, AsnType::Integer);
        assert_eq!(admin.info.enums[1], EnumItem::new("down", 2));
        assert_eq!(admin.info.units.as_deref(), Some("state"));
        assert_eq!(admin.info.access, Access::ReadWrite);
        assert_eq!(admin.info.defval.as_deref(), Some("up"));
    }

    #[test]
    fn test_missing_status_is_error() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             foo OBJECT-TYPE
                 SYNTAX Integer32
                 MAX-ACCESS read-only
                 ::= { bar 1 }
             END",
        );
        assert_eq!(body.error_count(), 1);
        assert!(body.diagnostics[0].message.contains("STATUS"));
        assert!(body.nodes.is_empty());
    }

    #[test]
    fn test_index_and_augments_conflict() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             fooEntry OBJECT-TYPE
                 SYNTAX FooEntry
                 MAX-ACCESS not-accessible
                 STATUS current
                 INDEX { fooIndex }
                 AUGMENTS { barEntry }
                 ::= { fooTable 1 }
             END",
        );
        assert_eq!(body.error_count(), 1);
        assert!(body.diagnostics.iter().any(|d| d.message.contains("AUGMENTS")));
        assert!(!body.defines("fooEntry"));
    }

    #[test]
    fn test_table_and_sequence() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             fooTable OBJECT-TYPE
                 SYNTAX SEQUENCE OF FooEntry
                 MAX-ACCESS not-accessible
                 STATUS current
                 ::= { foo 1 }
             FooEntry ::= SEQUENCE { fooIndex Integer32, fooName OCTET STRING }
             fooEntry OBJECT-TYPE
                 SYNTAX FooEntry
                 MAX-ACCESS not-accessible
                 STATUS current
                 AUGMENTS { barEntry }
                 ::= { fooTable 1 }
             END",
        );
        assert_eq!(node(&body, "fooTable").info.kind, NodeKind::Table);
        let entry = node(&body, "fooEntry");
        assert_eq!(entry.info.kind, NodeKind::Row);
        assert_eq!(entry.info.augments.as_deref(), Some("barEntry"));
        assert!(body.diagnostics.iter().all(|d| d.severity != Severity::Warning));
    }

    #[test]
    fn test_trap_type_produces_two_nodes() {
        let body = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
             linkDown TRAP-TYPE
                 ENTERPRISE acme
                 VARIABLES { ifIndex, ifAdminStatus }
                 DESCRIPTION "A link went down."
                 ::= 2
             END"#,
        );
        assert_eq!(body.nodes.len(), 2);
        let placeholder = node(&body, "acme#");
        assert_eq!(placeholder.parent, "acme");
        assert_eq!(placeholder.subid, Some(0));
        let trap = node(&body, "linkDown");
        assert_eq!(trap.parent, "acme#");
        assert_eq!(trap.subid, Some(2));
        assert_eq!(trap.info.kind, NodeKind::Notification);
        assert_eq!(trap.info.varbinds, vec!["ifIndex", "ifAdminStatus"]);
    }

    #[test]
    fn test_textual_convention_registration() {
        let body = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
             DisplayString ::= TEXTUAL-CONVENTION
                 DISPLAY-HINT "255a"
                 STATUS current
                 DESCRIPTION "Text."
                 SYNTAX OCTET STRING (SIZE (0..255))
             Name ::= DisplayString (SIZE (0..32))
             sysName OBJECT-TYPE
                 SYNTAX Name
                 MAX-ACCESS read-write
                 STATUS current
                 ::= { system 5 }
             END"#,
        );
        assert_eq!(body.tcs.len(), 2);
        let display = &body.tcs[0];
        assert_eq!(display.base, AsnType::OctetString);
        assert_eq!(display.hint.as_deref(), Some("255a"));
        assert_eq!(display.ranges, vec![RangeItem::new(0, 255)]);
        let name = &body.tcs[1];
        assert_eq!(name.hint.as_deref(), Some("255a"));
        assert_eq!(name.ranges, vec![RangeItem::new(0, 32)]);

        let sys_name = node(&body, "sysName");
        assert_eq!(sys_name.info.syntax, AsnType::OctetString);
        assert_eq!(sys_name.info.tc.as_deref(), Some("Name"));
        assert_eq!(sys_name.info.hint.as_deref(), Some("255a"));
    }

    #[test]
    fn test_imported_tc_lookup() {
        let mut tcs = TcTable::new();
        tcs.insert(TcEntry {
            name: "TruthValue".into(),
            module: ModuleId::from_raw(7).unwrap(),
            base: AsnType::Integer,
            hint: None,
            enums: vec![EnumItem::new("true", 1), EnumItem::new("false", 2)],
            ranges: Vec::new(),
            description: None,
        });
        let (_, body) = parse_with(
            "TEST-MIB DEFINITIONS ::= BEGIN
             fooEnabled OBJECT-TYPE
                 SYNTAX TruthValue
                 MAX-ACCESS read-write
                 STATUS current
                 ::= { foo 2 }
             END",
            &tcs,
        );
        let enabled = node(&body, "fooEnabled");
        assert_eq!(enabled.info.syntax, AsnType::Integer);
        assert_eq!(enabled.info.enums.len(), 2);
    }

    #[test]
    fn test_unknown_type_is_warning() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             foo OBJECT-TYPE
                 SYNTAX Mystery
                 MAX-ACCESS read-only
                 STATUS current
                 ::= { bar 1 }
             END",
        );
        assert_eq!(body.error_count(), 0);
        assert!(body
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("Mystery")));
        assert_eq!(node(&body, "foo").info.syntax, AsnType::Other);
    }

    #[test]
    fn test_range_bounds() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             Big ::= INTEGER (-2147483648..MAX | 18446744073709551615)
             END",
        );
        let big = &body.tcs[0];
        assert_eq!(big.ranges[0], RangeItem::new(-2_147_483_648, i64::MAX));
        assert_eq!(big.ranges[1], RangeItem::new(i64::MAX, i64::MAX));
    }

    #[test]
    fn test_builtin_type_assignments_are_dropped() {
        let body = parse(
            "RFC1155-SMI DEFINITIONS ::= BEGIN
             NetworkAddress ::= CHOICE { internet IpAddress }
             Counter ::= [APPLICATION 1] IMPLICIT INTEGER (0..4294967295)
             ObjectName ::= OBJECT IDENTIFIER
             END",
        );
        assert_eq!(body.error_count(), 0);
        assert_eq!(body.tcs.len(), 1);
        assert_eq!(body.tcs[0].name, "ObjectName");
        assert_eq!(body.tcs[0].base, AsnType::ObjectId);
    }

    #[test]
    fn test_macro_definition_is_noted() {
        let body = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
             OBJECT-TYPE MACRO ::=
             BEGIN
                 TYPE NOTATION ::= "SYNTAX" type(TYPE ObjectSyntax)
             END
             foo OBJECT IDENTIFIER ::= { iso 3 }
             END"#,
        );
        assert_eq!(body.error_count(), 0);
        assert!(body
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Note && d.message.contains("MACRO OBJECT-TYPE")));
        assert!(body.defines("foo"));
    }

    #[test]
    fn test_error_recovery_keeps_later_statements() {
        let body = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
             foo OBJECT-TYPE
                 SYNTAX Integer32
                 MAX-ACCESS sideways
                 STATUS current
                 ::= { bar 1 }
             baz OBJECT IDENTIFIER ::= { bar 2 }
             END",
        );
        assert_eq!(body.error_count(), 1);
        assert!(!body.defines("foo"));
        assert!(body.defines("baz"));
    }

    #[test]
    fn test_groups_and_compliance_references() {
        let body = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
             fooGroup OBJECT-GROUP
                 OBJECTS { fooName, fooValue }
                 STATUS current
                 DESCRIPTION "Objects."
                 ::= { fooGroups 1 }
             fooCompliance MODULE-COMPLIANCE
                 STATUS current
                 DESCRIPTION "Compliance."
                 MODULE
                     MANDATORY-GROUPS { fooGroup }
                     OBJECT fooValue
                         MIN-ACCESS read-only
                         DESCRIPTION "Write not required."
                 MODULE IF-MIB
                     MANDATORY-GROUPS { ifGeneralGroup }
                 ::= { fooCompliances 1 }
             END"#,
        );
        assert_eq!(body.error_count(), 0);
        assert_eq!(node(&body, "fooGroup").info.kind, NodeKind::Group);
        assert_eq!(node(&body, "fooCompliance").info.kind, NodeKind::Compliance);

        let names: Vec<_> = body.references.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["fooName", "fooValue", "fooGroup", "fooValue", "ifGeneralGroup"]
        );
        let foreign = body.references.last().unwrap();
        assert_eq!(foreign.module.as_deref(), Some("IF-MIB"));
        assert_eq!(foreign.site, ReferenceSite::Compliance);
    }

    #[test]
    fn test_multiple_modules_in_one_file() {
        let source = "A-MIB DEFINITIONS ::= BEGIN
             a OBJECT IDENTIFIER ::= { iso 3 }
             END
             B-MIB DEFINITIONS ::= BEGIN
             b OBJECT IDENTIFIER ::= { a 1 }
             END";
        let tcs = TcTable::new();
        let mut anonymous = 0;
        let mut parser = Parser::new(source.as_bytes(), CommentMode::EndOfLine);
        let mut names = Vec::new();
        while let Some(header) = parser.next_header() {
            let header = header.unwrap();
            let mut ctx = ParseContext {
                module: ModuleId::from_raw(1).unwrap(),
                imports: &[],
                tcs: &tcs,
                save_descriptions: false,
                anonymous: &mut anonymous,
            };
            let body = parser.parse_body(&mut ctx);
            names.push((header.name, body.nodes.len()));
        }
        assert_eq!(names, vec![("A-MIB".to_string(), 1), ("B-MIB".to_string(), 1)]);
    }

    #[test]
    fn test_descriptions_not_saved_when_disabled() {
        let tcs = TcTable::new();
        let mut anonymous = 0;
        let mut parser = Parser::new(
            br#"T DEFINITIONS ::= BEGIN
                foo OBJECT-IDENTITY STATUS current DESCRIPTION "x" ::= { iso 9 }
                END"#,
            CommentMode::EndOfLine,
        );
        parser.next_header().unwrap().unwrap();
        let mut ctx = ParseContext {
            module: ModuleId::from_raw(1).unwrap(),
            imports: &[],
            tcs: &tcs,
            save_descriptions: false,
            anonymous: &mut anonymous,
        };
        let body = parser.parse_body(&mut ctx);
        assert_eq!(body.nodes[0].info.description, None);
    }
}
