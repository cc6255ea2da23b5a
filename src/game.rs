//! Game tree: linked positions, variations and the game record text.

use std::fmt;

use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::{char as chr, multispace1};
use nom::sequence::delimited;
use nom::IResult;
use tracing::{debug, warn};

use crate::errors::{Error, Warning};
use crate::fen;
use crate::movement::Move;
use crate::notation;
use crate::piece::Color;
use crate::rules::{Position, Status};
use crate::ruleset::Ruleset;

/// Index of a node in the game's arena.
pub type NodeId = usize;

const ROOT: NodeId = 0;

/// Game results, as stored in headers and as the record terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    DoubleLoss,
    Unterminated,
}

impl GameResult {
    pub fn token(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::DoubleLoss => "0-0",
            GameResult::Unterminated => "*",
        }
    }

    pub fn from_token(token: &str) -> Option<GameResult> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            "0-0" => Some(GameResult::DoubleLoss),
            "*" => Some(GameResult::Unterminated),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One position in the tree.
///
/// The parent link is a plain index, purely navigational: children are
/// owned by the arena through their parent's `children` list, so the
/// ownership graph stays a strict forest.
#[derive(Debug)]
struct Node {
    position: Position,
    parent: Option<(NodeId, Move)>,
    children: Vec<(Move, NodeId)>,
    comment: Option<String>,
}

/// A game: a tree of positions with a cursor, header tags and a
/// result.
///
/// The first child of a node is the main line, the others are
/// variations in the order they were added. Tags are opaque key/value
/// pairs; only `Result` gets interpreted, when parsing a record.
#[derive(Debug)]
pub struct Game {
    nodes: Vec<Node>,
    cursor: NodeId,
    tags: Vec<(String, String)>,
    result: GameResult,
}

impl Game {
    /// New game rooted at `position`.
    pub fn new(position: Position) -> Game {
        Game {
            nodes: vec![Node { position, parent: None, children: vec![], comment: None }],
            cursor: ROOT,
            tags: vec![],
            result: GameResult::Unterminated,
        }
    }

    /// New game from the standard starting position.
    pub fn from_start() -> Game {
        Game::new(Position::from_start())
    }

    /// Position under the cursor.
    pub fn current(&self) -> &Position {
        &self.nodes[self.cursor].position
    }

    pub fn root(&self) -> &Position {
        &self.nodes[ROOT].position
    }

    pub fn go_to_root(&mut self) {
        self.cursor = ROOT;
    }

    /// Move the cursor to the parent node; no-op at the root.
    pub fn step_back(&mut self) -> bool {
        match self.nodes[self.cursor].parent {
            Some((parent, _)) => {
                self.cursor = parent;
                true
            }
            None => false,
        }
    }

    /// Move the cursor to the main-line child; no-op at a leaf.
    pub fn step_forward(&mut self) -> bool {
        match self.nodes[self.cursor].children.first() {
            Some(&(_, child)) => {
                self.cursor = child;
                true
            }
            None => false,
        }
    }

    /// Play `m` from the current position and move the cursor to the
    /// resulting node.
    ///
    /// A move already present as a child is reused; a new move becomes
    /// a sibling variation of any existing children. Moves not legal
    /// in the current position are rejected.
    pub fn apply_move(&mut self, m: &Move) -> Result<(), Error> {
        if let Some(&(_, child)) =
            self.nodes[self.cursor].children.iter().find(|(existing, _)| existing == m)
        {
            self.cursor = child;
            return Ok(());
        }
        let successor = self.current().play(m)?;
        let id = self.nodes.len();
        self.nodes.push(Node {
            position: successor,
            parent: Some((self.cursor, *m)),
            children: vec![],
            comment: None,
        });
        self.nodes[self.cursor].children.push((*m, id));
        self.cursor = id;
        Ok(())
    }

    /// Resolve algebraic notation against the current position and
    /// play it.
    pub fn apply_san(&mut self, text: &str) -> Result<(), Error> {
        let m = notation::parse_san(self.current(), text)?;
        self.apply_move(&m)
    }

    /// Comment attached to the current position, if any.
    pub fn comment(&self) -> Option<&str> {
        self.nodes[self.cursor].comment.as_deref()
    }

    pub fn set_comment(&mut self, text: &str) {
        self.nodes[self.cursor].comment = Some(text.to_string());
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn set_tag(&mut self, key: &str, value: &str) {
        match self.tags.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.tags.push((key.to_string(), value.to_string())),
        }
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn set_result(&mut self, result: GameResult) {
        self.result = result;
    }

    /// Status of the current position, repetition included.
    ///
    /// Repetition walks the ancestor chain two plies at a time (same
    /// side to move) and triggers on the third identical diagram.
    pub fn status(&self) -> Status {
        let status = self.current().status();
        if status != Status::Ongoing {
            return status;
        }
        let current = self.current();
        let mut seen = 1;
        let mut id = self.cursor;
        loop {
            let up = self.nodes[id].parent.map(|(p, _)| p);
            let up2 = match up.and_then(|p| self.nodes[p].parent.map(|(g, _)| g)) {
                Some(g) => g,
                None => break,
            };
            id = up2;
            if self.nodes[id].position.same_diagram(current) {
                seen += 1;
                if seen >= 3 {
                    return Status::TripleRepetition;
                }
            }
        }
        Status::Ongoing
    }

    /// Render the whole tree as record text: header tags, the move
    /// list with `{}` comments and parenthesized variations, and the
    /// result token.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.tags {
            out.push_str(&format!("[{} \"{}\"]\n", key, value));
        }
        if !self.tags.is_empty() {
            out.push('\n');
        }
        let mut tokens: Vec<String> = vec![];
        if let Some(comment) = &self.nodes[ROOT].comment {
            tokens.push(format!("{{{}}}", comment));
        }
        self.render_line(ROOT, false, &mut tokens);
        tokens.push(self.result.token().to_string());
        out.push_str(&tokens.join(" "));
        out.push('\n');
        out
    }

    /// Depth-first rendering from `id`: main move first, then each
    /// variation parenthesized right after it, then the main line
    /// continuation.
    fn render_line(&self, id: NodeId, number_pending: bool, tokens: &mut Vec<String>) {
        let node = &self.nodes[id];
        let (main_move, main_id) = match node.children.first() {
            Some(&entry) => entry,
            None => return,
        };
        self.push_move_tokens(id, &main_move, main_id, number_pending, tokens);
        for &(var_move, var_id) in &node.children[1..] {
            tokens.push("(".to_string());
            self.push_move_tokens(id, &var_move, var_id, true, tokens);
            self.render_line(var_id, self.nodes[var_id].comment.is_some(), tokens);
            tokens.push(")".to_string());
        }
        // After a comment or variation, Black repeats the move number.
        let interrupted =
            node.children.len() > 1 || self.nodes[main_id].comment.is_some();
        self.render_line(main_id, interrupted, tokens);
    }

    fn push_move_tokens(
        &self,
        id: NodeId,
        m: &Move,
        child: NodeId,
        number_pending: bool,
        tokens: &mut Vec<String>,
    ) {
        let position = &self.nodes[id].position;
        match position.color() {
            Color::White => tokens.push(format!("{}.", position.fullmove())),
            Color::Black if number_pending => {
                tokens.push(format!("{}...", position.fullmove()))
            }
            Color::Black => {}
        }
        let mut text = notation::san_body(position, m);
        let next = &self.nodes[child].position;
        if next.is_in_check() {
            text.push(if next.legal_moves().is_empty() { '#' } else { '+' });
        }
        tokens.push(text);
        if let Some(comment) = &self.nodes[child].comment {
            tokens.push(format!("{{{}}}", comment));
        }
    }

    /// Parse record text into a game plus any warnings, leaving the
    /// cursor at the root.
    ///
    /// Variations branch from the position where their parenthesis
    /// opened; the cursor is restored when it closes. A `FEN` header
    /// tag overrides the starting position. The declared `Result`
    /// header is authoritative: a disagreeing terminator token only
    /// produces a warning.
    pub fn parse(text: &str) -> Result<(Game, Vec<Warning>), Error> {
        let mut tags: Vec<(String, String)> = vec![];
        let mut rest = text.trim_start();
        while rest.starts_with('[') {
            let (next, tag) = parse_tag(rest).map_err(|_| Error::MalformedGameRecord {
                token: rest.lines().next().unwrap_or("").to_string(),
                context: "invalid header tag".to_string(),
            })?;
            tags.push(tag);
            rest = next.trim_start();
        }

        debug!(tags = tags.len(), "parsed game record headers");
        let root = match tags.iter().find(|(k, _)| k == "FEN") {
            Some((_, fen_text)) => fen::parse(fen_text, &Ruleset::standard())?,
            None => Position::from_start(),
        };
        let mut game = Game::new(root);
        game.tags = tags;

        let mut stack: Vec<NodeId> = vec![];
        let mut body_result: Option<GameResult> = None;
        let mut scanner = rest;
        while let Some((token, next)) = next_token(scanner)? {
            scanner = next;
            if body_result.is_some() {
                return Err(Error::MalformedGameRecord {
                    token: token_text(&token),
                    context: "text after the result token".to_string(),
                });
            }
            match token {
                Token::Open => {
                    let parent = game.nodes[game.cursor].parent.map(|(p, _)| p).ok_or_else(
                        || Error::MalformedGameRecord {
                            token: "(".to_string(),
                            context: "variation before any move".to_string(),
                        },
                    )?;
                    stack.push(game.cursor);
                    game.cursor = parent;
                }
                Token::Close => {
                    game.cursor = stack.pop().ok_or_else(|| Error::MalformedGameRecord {
                        token: ")".to_string(),
                        context: "unmatched closing parenthesis".to_string(),
                    })?;
                }
                Token::Comment(comment) => {
                    game.nodes[game.cursor].comment = Some(comment.trim().to_string());
                }
                Token::MoveNumber => {}
                Token::Result(result) => body_result = Some(result),
                Token::San(san) => {
                    let m = notation::parse_san(game.current(), san).map_err(|e| {
                        Error::MalformedGameRecord {
                            token: san.to_string(),
                            context: e.to_string(),
                        }
                    })?;
                    game.apply_move(&m)?;
                }
            }
        }
        if !stack.is_empty() {
            return Err(Error::MalformedGameRecord {
                token: "(".to_string(),
                context: "unmatched opening parenthesis".to_string(),
            });
        }
        let body = body_result.ok_or_else(|| Error::MalformedGameRecord {
            token: "<end>".to_string(),
            context: "missing result token".to_string(),
        })?;

        let mut warnings = vec![];
        game.result = body;
        if let Some(header) = game.tag("Result").map(str::to_string) {
            match GameResult::from_token(&header) {
                Some(declared) => {
                    if declared != body {
                        warn!(header = %header, body = %body, "result token mismatch");
                        warnings.push(Warning::ResultMismatch {
                            header,
                            body: body.token().to_string(),
                        });
                    }
                    game.result = declared;
                }
                None => {
                    warn!(header = %header, "unknown header result, keeping body token");
                    warnings.push(Warning::ResultMismatch {
                        header,
                        body: body.token().to_string(),
                    });
                }
            }
        }
        game.go_to_root();
        Ok((game, warnings))
    }
}

enum Token<'a> {
    Open,
    Close,
    Comment(&'a str),
    MoveNumber,
    Result(GameResult),
    San(&'a str),
}

fn token_text(token: &Token) -> String {
    match token {
        Token::Open => "(".to_string(),
        Token::Close => ")".to_string(),
        Token::Comment(c) => format!("{{{}}}", c),
        Token::MoveNumber => "<move number>".to_string(),
        Token::Result(r) => r.token().to_string(),
        Token::San(s) => s.to_string(),
    }
}

/// Scan the next movetext token, if any.
fn next_token(i: &str) -> Result<Option<(Token, &str)>, Error> {
    let i = i.trim_start();
    if i.is_empty() {
        return Ok(None);
    }
    if let Some(rest) = i.strip_prefix('(') {
        return Ok(Some((Token::Open, rest)));
    }
    if let Some(rest) = i.strip_prefix(')') {
        return Ok(Some((Token::Close, rest)));
    }
    if let Some(rest) = i.strip_prefix('{') {
        return match rest.find('}') {
            Some(end) => Ok(Some((Token::Comment(&rest[..end]), &rest[end + 1..]))),
            None => Err(Error::MalformedGameRecord {
                token: "{".to_string(),
                context: "unterminated comment".to_string(),
            }),
        };
    }
    let end = i
        .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '{'))
        .unwrap_or(i.len());
    let word = &i[..end];
    let rest = &i[end..];
    let token = if let Some(result) = GameResult::from_token(word) {
        Token::Result(result)
    } else if word.chars().all(|c| c.is_ascii_digit() || c == '.')
        && word.starts_with(|c: char| c.is_ascii_digit())
    {
        Token::MoveNumber
    } else {
        Token::San(word)
    };
    Ok(Some((token, rest)))
}

/// `[Key "Value"]` header line.
fn parse_tag(i: &str) -> IResult<&str, (String, String)> {
    let (i, _) = chr('[')(i)?;
    let (i, key) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(i)?;
    let (i, _) = multispace1(i)?;
    let (i, value) = delimited(chr('"'), take_while(|c| c != '"'), chr('"'))(i)?;
    let (i, _) = chr(']')(i)?;
    Ok((i, (key.to_string(), value.to_string())))
}
