pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod evaluator;
pub mod filter;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{ComparisonOperator, Connective, Filter, Token, TokenKind};
pub use evaluator::{EvalError, Evaluator, PathValue};
pub use filter::{CompiledFilter, FilterError, compile, filter_array};
pub use lexer::{LexError, Lexer, tokenize};
pub use parser::{MAX_NESTING_DEPTH, ParseError, Parser};
pub use value::{Variable, VariableKind};
