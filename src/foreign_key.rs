//! Foreign-key references and the DDL clause parser.
//!
//! References normally come from SQLite's reflection (see
//! [`Catalog::foreign_keys`](crate::catalog::Catalog::foreign_keys)). The
//! [`ForeignKeySource::Ddl`] mode reads them from the stored creation SQL
//! instead: every line mentioning `FOREIGN KEY` is tokenized and each
//!
//! ```sql
//! FOREIGN KEY ( col [, col]* ) REFERENCES table [ ( col [, col]* ) ]
//! ```
//!
//! clause on it is extracted. A line that mentions `FOREIGN KEY` but holds
//! no parseable clause becomes a [`SkippedClause`]; the rest of the table,
//! and every other table, is still processed.

use std::{fmt, str::FromStr, sync::LazyLock};

use compact_str::CompactString;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sqlparser::{
    dialect::SQLiteDialect,
    keywords::Keyword,
    tokenizer::{Token, TokenWithSpan, Tokenizer}
};
use thiserror::Error;
use tracing::warn;

/// Column names of one side of a key (almost always a single column)
pub type ColumnList = SmallVec<[CompactString; 2]>;

/// Case-insensitive `FOREIGN KEY` as it appears in stored SQL text.
static FOREIGN_KEY_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FOREIGN KEY").expect("valid regex"));

/// Where foreign-key edges are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeignKeySource {
    /// SQLite's own `pragma_foreign_key_list`
    #[default]
    Catalog,
    /// Line-by-line parsing of the stored creation statement
    Ddl
}

impl fmt::Display for ForeignKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Ddl => write!(f, "ddl")
        }
    }
}

impl FromStr for ForeignKeySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "ddl" => Ok(Self::Ddl),
            other => Err(format!("unknown foreign key source '{}'", other))
        }
    }
}

/// A foreign key from one table to another.
///
/// Not validated against the catalog: the target may name a table that
/// does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyReference {
    pub source_table:   String,
    pub source_columns: ColumnList,
    pub target_table:   String,
    /// Empty when the key references the target's primary key implicitly
    pub target_columns: ColumnList
}

impl ForeignKeyReference {
    /// Edge label: the local columns, comma separated
    pub fn label(&self) -> String {
        join_columns(&self.source_columns)
    }

    pub fn is_self_reference(&self) -> bool {
        self.source_table == self.target_table
    }
}

/// Why a `FOREIGN KEY` mention could not be turned into a reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClauseError {
    #[error("line mentions FOREIGN KEY but holds no FOREIGN KEY clause")]
    NotFound,
    #[error("expected '(' after FOREIGN KEY")]
    MissingColumnList,
    #[error("empty column list")]
    EmptyColumnList,
    #[error("unterminated column list")]
    UnclosedColumnList,
    #[error("unexpected token '{0}' in column list")]
    UnexpectedToken(String),
    #[error("missing REFERENCES")]
    MissingReferences,
    #[error("missing referenced table after REFERENCES")]
    MissingTarget,
    #[error("cannot tokenize line: {0}")]
    Tokenize(String)
}

/// One well-formed clause, before it is attached to its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClause {
    pub columns:        ColumnList,
    pub target_table:   String,
    pub target_columns: ColumnList
}

/// A `FOREIGN KEY` line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedClause {
    pub table:  String,
    /// 1-based line within the creation statement
    pub line:   usize,
    pub text:   String,
    pub reason: String
}

/// References and skipped lines found in one creation statement.
#[derive(Debug, Default, Clone)]
pub struct DdlForeignKeys {
    pub references: Vec<ForeignKeyReference>,
    pub skipped:    Vec<SkippedClause>
}

/// Number of case-insensitive `FOREIGN KEY` occurrences in `sql`.
pub fn count_foreign_key_mentions(sql: &str) -> usize {
    FOREIGN_KEY_TEXT.find_iter(sql).count()
}

/// Extract the references declared in `sql`, the creation statement of
/// `table`. Malformed lines are logged and reported, never fatal.
///
/// The statement is tokenized as a whole, so comments and quoted text that
/// span several lines are recognized; clauses are still read line by line.
/// When the statement does not tokenize, each line is tokenized on its own.
pub fn from_ddl(table: &str, sql: &str) -> DdlForeignKeys {
    let statement = tokens_by_line(sql);
    let mut found = DdlForeignKeys::default();
    for (index, line) in sql.lines().enumerate() {
        if !FOREIGN_KEY_TEXT.is_match(line) {
            continue;
        }
        let results = match &statement {
            Some(lines) => parse_tokens(lines.get(index).map(Vec::as_slice).unwrap_or_default()),
            None => parse_line(line)
        };
        for result in results {
            match result {
                Ok(clause) => found.references.push(ForeignKeyReference {
                    source_table:   table.to_string(),
                    source_columns: clause.columns,
                    target_table:   clause.target_table,
                    target_columns: clause.target_columns
                }),
                Err(err) => {
                    warn!(table, line = index + 1, text = line.trim(), error = %err, "skipping foreign key clause");
                    found.skipped.push(SkippedClause {
                        table:  table.to_string(),
                        line:   index + 1,
                        text:   line.trim().to_string(),
                        reason: err.to_string()
                    });
                }
            }
        }
    }
    found
}

/// Parse every `FOREIGN KEY` clause on one line of SQL.
///
/// Always returns at least one entry.
pub fn parse_line(line: &str) -> Vec<Result<ParsedClause, ClauseError>> {
    let dialect = SQLiteDialect {};
    let tokens = match Tokenizer::new(&dialect, line).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => return vec![Err(ClauseError::Tokenize(e.to_string()))]
    };
    let tokens: Vec<Token> = tokens.into_iter().filter(is_significant).collect();
    parse_tokens(&tokens)
}

/// Significant tokens of `sql`, grouped by the 1-based line they start on.
fn tokens_by_line(sql: &str) -> Option<Vec<Vec<Token>>> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql).tokenize_with_location().ok()?;
    let mut lines: Vec<Vec<Token>> = vec![Vec::new(); sql.lines().count()];
    for TokenWithSpan { token, span } in tokens {
        if !is_significant(&token) {
            continue;
        }
        let index = usize::try_from(span.start.line).unwrap_or(0).saturating_sub(1);
        if let Some(line) = lines.get_mut(index) {
            line.push(token);
        }
    }
    Some(lines)
}

fn is_significant(token: &Token) -> bool {
    !matches!(token, Token::Whitespace(_) | Token::EOF)
}

/// Parse every `FOREIGN KEY` clause in one line's significant tokens.
fn parse_tokens(tokens: &[Token]) -> Vec<Result<ParsedClause, ClauseError>> {
    let mut results = Vec::new();
    let mut i = 0;
    while i + 1 < tokens.len() {
        if is_keyword(&tokens[i], Keyword::FOREIGN) && is_keyword(&tokens[i + 1], Keyword::KEY) {
            let mut cursor = Cursor {
                tokens,
                pos:    i + 2
            };
            let result = cursor.clause();
            i = if result.is_ok() { cursor.pos } else { i + 2 };
            results.push(result);
        } else {
            i += 1;
        }
    }

    if results.is_empty() {
        results.push(Err(ClauseError::NotFound));
    }
    results
}

pub(crate) fn join_columns(columns: &[CompactString]) -> String {
    columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_keyword(token: &Token, keyword: Keyword) -> bool {
    matches!(token, Token::Word(w) if w.keyword == keyword && w.quote_style.is_none())
}

fn identifier(token: &Token) -> Option<CompactString> {
    match token {
        Token::Word(w) => Some(CompactString::from(w.value.as_str())),
        Token::SingleQuotedString(s) => Some(CompactString::from(s.as_str())),
        _ => None
    }
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos:    usize
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        match self.peek() {
            Some(token) if is_keyword(token, keyword) => {
                self.pos += 1;
                true
            }
            _ => false
        }
    }

    fn clause(&mut self) -> Result<ParsedClause, ClauseError> {
        if !self.eat(&Token::LParen) {
            return Err(ClauseError::MissingColumnList);
        }
        let columns = self.identifier_list()?;
        if !self.eat_keyword(Keyword::REFERENCES) {
            return Err(ClauseError::MissingReferences);
        }
        let target_table = self.qualified_name().ok_or(ClauseError::MissingTarget)?;
        let target_columns = if self.eat(&Token::LParen) {
            self.identifier_list()?
        } else {
            ColumnList::new()
        };
        Ok(ParsedClause {
            columns,
            target_table,
            target_columns
        })
    }

    /// Identifiers up to and including the closing parenthesis.
    fn identifier_list(&mut self) -> Result<ColumnList, ClauseError> {
        let mut columns = ColumnList::new();
        loop {
            match self.next() {
                None => return Err(ClauseError::UnclosedColumnList),
                Some(Token::RParen) => return Err(ClauseError::EmptyColumnList),
                Some(token) => {
                    let name = identifier(token)
                        .ok_or_else(|| ClauseError::UnexpectedToken(token.to_string()))?;
                    columns.push(name);
                }
            }
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(columns),
                Some(token) => return Err(ClauseError::UnexpectedToken(token.to_string())),
                None => return Err(ClauseError::UnclosedColumnList)
            }
        }
    }

    /// `name` or `schema.name`; the last segment is the table.
    fn qualified_name(&mut self) -> Option<String> {
        let mut name = identifier(self.peek()?)?;
        self.pos += 1;
        while self.eat(&Token::Period) {
            name = identifier(self.peek()?)?;
            self.pos += 1;
        }
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(line: &str) -> Result<ParsedClause, ClauseError> {
        let mut results = parse_line(line);
        assert_eq!(results.len(), 1, "expected one clause in {line:?}");
        results.remove(0)
    }

    #[test]
    fn test_parse_simple_clause() {
        let clause = single("  FOREIGN KEY (student_id) REFERENCES Student(id),").unwrap();
        assert_eq!(clause.columns.as_slice(), ["student_id"]);
        assert_eq!(clause.target_table, "Student");
        assert_eq!(clause.target_columns.as_slice(), ["id"]);
    }

    #[test]
    fn test_parse_lowercase_without_spaces() {
        let clause = single("foreign key(course_id) references course(id)").unwrap();
        assert_eq!(clause.columns.as_slice(), ["course_id"]);
        assert_eq!(clause.target_table, "course");
    }

    #[test]
    fn test_parse_quoted_identifiers() {
        let clause = single(r#"FOREIGN KEY ("owner id") REFERENCES "user table" (`id`)"#).unwrap();
        assert_eq!(clause.columns.as_slice(), ["owner id"]);
        assert_eq!(clause.target_table, "user table");
        assert_eq!(clause.target_columns.as_slice(), ["id"]);
    }

    #[test]
    fn test_parse_multi_column_key() {
        let clause = single("FOREIGN KEY (a, b) REFERENCES pair (x, y) ON DELETE CASCADE").unwrap();
        assert_eq!(clause.columns.as_slice(), ["a", "b"]);
        assert_eq!(clause.target_columns.len(), 2);
    }

    #[test]
    fn test_parse_schema_qualified_target() {
        let clause = single("FOREIGN KEY (a) REFERENCES main.parent").unwrap();
        assert_eq!(clause.target_table, "parent");
        assert!(clause.target_columns.is_empty());
    }

    #[test]
    fn test_parse_two_clauses_on_one_line() {
        let results = parse_line(
            "CREATE TABLE e (a INT, b INT, FOREIGN KEY(a) REFERENCES s(id), FOREIGN KEY(b) REFERENCES c(id))"
        );
        assert_eq!(results.len(), 2);
        let targets: Vec<_> = results
            .into_iter()
            .map(|r| r.unwrap().target_table)
            .collect();
        assert_eq!(targets, ["s", "c"]);
    }

    #[test]
    fn test_missing_references() {
        assert_eq!(
            single("FOREIGN KEY (a) Student(id)"),
            Err(ClauseError::MissingReferences)
        );
    }

    #[test]
    fn test_missing_column_list() {
        assert_eq!(
            single("FOREIGN KEY a REFERENCES b(id)"),
            Err(ClauseError::MissingColumnList)
        );
    }

    #[test]
    fn test_empty_column_list() {
        assert_eq!(
            single("FOREIGN KEY () REFERENCES b(id)"),
            Err(ClauseError::EmptyColumnList)
        );
    }

    #[test]
    fn test_missing_target() {
        assert_eq!(
            single("FOREIGN KEY (a) REFERENCES"),
            Err(ClauseError::MissingTarget)
        );
    }

    #[test]
    fn test_mention_in_comment_is_not_a_clause() {
        assert_eq!(single("-- FOREIGN KEY added later"), Err(ClauseError::NotFound));
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            single("FOREIGN KEY (\"a) REFERENCES b"),
            Err(ClauseError::Tokenize(_))
        ));
    }

    #[test]
    fn test_from_ddl_collects_references_and_skips() {
        let sql = "CREATE TABLE Enrollment (\n\
                   student_id INT,\n\
                   course_id INT,\n\
                   FOREIGN KEY (student_id) REFERENCES Student(id),\n\
                   FOREIGN KEY (course_id) Course(id)\n\
                   )";
        let found = from_ddl("Enrollment", sql);
        assert_eq!(found.references.len(), 1);
        assert_eq!(found.references[0].target_table, "Student");
        assert_eq!(found.references[0].label(), "student_id");
        assert_eq!(found.skipped.len(), 1);
        assert_eq!(found.skipped[0].line, 5);
        assert_eq!(found.skipped[0].table, "Enrollment");
    }

    #[test]
    fn test_from_ddl_comment_continues_on_next_line() {
        let sql = "CREATE TABLE pet (\n\
                   id INTEGER PRIMARY KEY,\n\
                   owner_id INTEGER,\n\
                   FOREIGN KEY (owner_id) REFERENCES owner(id) /* owner\n\
                   of the pet */\n\
                   )";
        let found = from_ddl("pet", sql);
        assert!(found.skipped.is_empty());
        assert_eq!(found.references.len(), 1);
        assert_eq!(found.references[0].target_table, "owner");
        assert_eq!(found.references[0].label(), "owner_id");
    }

    #[test]
    fn test_from_ddl_clause_inside_block_comment_is_skipped() {
        let sql = "CREATE TABLE pet (\n\
                   owner_id INTEGER /* was:\n\
                   FOREIGN KEY (owner_id) REFERENCES owner(id) */\n\
                   )";
        let found = from_ddl("pet", sql);
        assert!(found.references.is_empty());
        assert_eq!(found.skipped.len(), 1);
        assert_eq!(found.skipped[0].line, 3);
        assert_eq!(found.skipped[0].reason, ClauseError::NotFound.to_string());
    }

    #[test]
    fn test_from_ddl_falls_back_to_lines() {
        let sql = "CREATE TABLE pet (\n\
                   FOREIGN KEY (owner_id) REFERENCES owner(id),\n\
                   note TEXT DEFAULT 'unterminated\n\
                   )";
        let found = from_ddl("pet", sql);
        assert_eq!(found.references.len(), 1);
        assert_eq!(found.references[0].target_table, "owner");
    }

    #[test]
    fn test_count_mentions_is_case_insensitive() {
        assert_eq!(count_foreign_key_mentions("FOREIGN KEY foreign key Foreign Key"), 3);
        assert_eq!(count_foreign_key_mentions("FOREIGNKEY"), 0);
        assert_eq!(count_foreign_key_mentions(""), 0);
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!(
            "catalog".parse::<ForeignKeySource>(),
            Ok(ForeignKeySource::Catalog)
        );
        assert_eq!(" DDL ".parse::<ForeignKeySource>(), Ok(ForeignKeySource::Ddl));
        assert!("pragma".parse::<ForeignKeySource>().is_err());
    }

    #[test]
    fn test_label_joins_columns() {
        let reference = ForeignKeyReference {
            source_table:   "a".into(),
            source_columns: ColumnList::from_vec(vec!["x".into(), "y".into()]),
            target_table:   "a".into(),
            target_columns: ColumnList::new()
        };
        assert_eq!(reference.label(), "x, y");
        assert!(reference.is_self_reference());
    }
}
