//! Bracketed constituency trees, as found in the Penn Treebank `.mrg` files.
//!
//! ```text
//! tree  = '(' label? child* ')'
//! child = tree | leaf
//! ```
//!
//! Labels and leaves are runs of characters that are neither whitespace nor
//! parentheses. Treebank files wrap each sentence in an unlabeled root, so
//! `( (S (NP-SBJ (PRP I)) (VP (VBP know))) )` parses to a tree whose label is
//! the empty string.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur while reading bracket notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeParseError {
    /// The input held nothing but whitespace
    #[error("empty tree")]
    Empty,

    /// Something other than `(` appeared where a tree must start
    #[error("expected '(' at offset {offset}, found {found:?}")]
    ExpectedOpen { found: String, offset: usize },

    /// A `(` was never closed
    #[error("unclosed '(' at offset {offset}")]
    Unclosed { offset: usize },

    /// Input continued after the root tree was closed
    #[error("unexpected input after tree at offset {offset}")]
    TrailingInput { offset: usize },

    /// Brackets nested deeper than [`MAX_TREE_DEPTH`]
    #[error("tree nested deeper than {} levels at offset {offset}", MAX_TREE_DEPTH)]
    TooDeep { offset: usize },
}

/// Deepest bracket nesting accepted by [`SyntaxTree::parse`]. Treebank trees
/// stay well below this.
pub const MAX_TREE_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn tokenize(input: &str) -> Vec<(usize, Token<'_>)> {
    let mut tokens = Vec::new();
    let mut atom_start: Option<usize> = None;

    for (offset, ch) in input.char_indices() {
        if ch == '(' || ch == ')' || ch.is_whitespace() {
            if let Some(start) = atom_start.take() {
                tokens.push((start, Token::Atom(&input[start..offset])));
            }
            match ch {
                '(' => tokens.push((offset, Token::Open)),
                ')' => tokens.push((offset, Token::Close)),
                _ => {}
            }
        } else if atom_start.is_none() {
            atom_start = Some(offset);
        }
    }
    if let Some(start) = atom_start {
        tokens.push((start, Token::Atom(&input[start..])));
    }

    tokens
}

/// A child of a [`SyntaxTree`]: either a subtree or a terminal word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    Tree(SyntaxTree),
    Leaf(String),
}

/// A labeled constituent and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    label: String,
    children: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn new(label: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Parse a single tree from bracket notation.
    pub fn parse(input: &str) -> Result<Self, TreeParseError> {
        let mut parser = Parser {
            tokens: tokenize(input),
            pos: 0,
            depth: 0,
            input_len: input.len(),
        };
        parser.parse_root()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// The terminal words of this tree, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        self.pos().into_iter().map(|(word, _)| word).collect()
    }

    /// Every terminal word paired with the label of the constituent that
    /// directly dominates it, left to right.
    pub fn pos(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        self.collect_pos(&mut pairs);
        pairs
    }

    fn collect_pos<'a>(&'a self, pairs: &mut Vec<(&'a str, &'a str)>) {
        for child in &self.children {
            match child {
                SyntaxNode::Tree(tree) => tree.collect_pos(pairs),
                SyntaxNode::Leaf(word) => pairs.push((word.as_str(), self.label.as_str())),
            }
        }
    }

    /// Number of tree levels down to the deepest leaf; a preterminal such as
    /// `(NN dog)` has height 2.
    pub fn height(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                SyntaxNode::Tree(tree) => tree.height(),
                SyntaxNode::Leaf(_) => 1,
            })
            .max()
            .unwrap_or(0)
    }
}

impl FromStr for SyntaxTree {
    type Err = TreeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyntaxTree::parse(s)
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.label)?;
        for child in &self.children {
            match child {
                SyntaxNode::Tree(tree) => write!(f, " {tree}")?,
                SyntaxNode::Leaf(word) => write!(f, " {word}")?,
            }
        }
        write!(f, ")")
    }
}

struct Parser<'a> {
    tokens: Vec<(usize, Token<'a>)>,
    pos: usize,
    depth: usize,
    input_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&(usize, Token<'a>)> {
        self.tokens.get(self.pos)
    }

    fn parse_root(&mut self) -> Result<SyntaxTree, TreeParseError> {
        let tree = match self.peek() {
            None => return Err(TreeParseError::Empty),
            Some((_, Token::Open)) => self.parse_tree()?,
            Some((offset, token)) => {
                return Err(TreeParseError::ExpectedOpen {
                    found: match token {
                        Token::Atom(atom) => atom.to_string(),
                        _ => ")".into(),
                    },
                    offset: *offset,
                });
            }
        };

        match self.peek() {
            None => Ok(tree),
            Some((offset, _)) => Err(TreeParseError::TrailingInput { offset: *offset }),
        }
    }

    /// Parse a tree starting at the current `(`.
    fn parse_tree(&mut self) -> Result<SyntaxTree, TreeParseError> {
        let open_offset = self.peek().map(|(offset, _)| *offset).unwrap_or(self.input_len);
        if self.depth == MAX_TREE_DEPTH {
            return Err(TreeParseError::TooDeep {
                offset: open_offset,
            });
        }
        self.depth += 1;
        self.pos += 1;

        let label = match self.peek() {
            Some((_, Token::Atom(atom))) => {
                let label = atom.to_string();
                self.pos += 1;
                label
            }
            _ => String::new(),
        };

        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some((_, Token::Open)) => children.push(SyntaxNode::Tree(self.parse_tree()?)),
                Some((_, Token::Atom(atom))) => {
                    children.push(SyntaxNode::Leaf(atom.to_string()));
                    self.pos += 1;
                }
                Some((_, Token::Close)) => {
                    self.pos += 1;
                    self.depth -= 1;
                    return Ok(SyntaxTree::new(label, children));
                }
                None => return Err(TreeParseError::Unclosed { offset: open_offset }),
            }
        }
    }
}
