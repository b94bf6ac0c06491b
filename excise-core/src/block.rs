//! Block extent tracking - finds where a multi-line construct really ends.
//!
//! A block opener (a callback registration spanning several lines) cannot be
//! bounded from its first line alone. The tracker is a two-state machine
//! (Idle / InBlock) that accumulates nesting depth from two independent
//! delimiter kinds - grouping `()` and scoping `{}` - and closes the block
//! only when *both* depths return to zero or below. Either depth reaching
//! zero on its own must not terminate the block: a closure may close its
//! parameter list before its body, or contain nested grouping deeper than the
//! opener line.
//!
//! Delimiters are counted as raw characters, including those inside string
//! literals and comments. That is a deliberate approximation; the tool is not
//! a parser.

/// Per-line balance of grouping and scoping delimiters.
///
/// Returns `(parens, braces)` as opening minus closing counts.
pub fn delimiter_balance(line: &str) -> (i32, i32) {
    let mut parens = 0i32;
    let mut braces = 0i32;
    for ch in line.chars() {
        match ch {
            '(' => parens += 1,
            ')' => parens -= 1,
            '{' => braces += 1,
            '}' => braces -= 1,
            _ => {}
        }
    }
    (parens, braces)
}

/// State machine tracking one in-progress multi-line construct.
#[derive(Debug, Clone, Default)]
pub struct BlockTracker {
    parens: i32,
    braces: i32,
    start: usize,
    active: bool,
}

impl BlockTracker {
    /// A tracker in the Idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tracker is currently inside a block.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the line that opened the current block.
    ///
    /// Only meaningful while [`is_active`](Self::is_active) returns true.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Enter the InBlock state at `index`, seeding both depth counters from
    /// the opener line's own delimiter balance.
    ///
    /// Returns `true` when the opener line already balances itself (a
    /// single-line block), in which case the tracker stays Idle.
    pub fn open(&mut self, index: usize, line: &str) -> bool {
        let (parens, braces) = delimiter_balance(line);
        if parens <= 0 && braces <= 0 {
            return true;
        }
        self.parens = parens;
        self.braces = braces;
        self.start = index;
        self.active = true;
        false
    }

    /// Consume one line while InBlock.
    ///
    /// Returns `true` exactly when both depth counters are <= 0 after this
    /// line, transitioning the tracker back to Idle.
    pub fn feed(&mut self, line: &str) -> bool {
        let (parens, braces) = delimiter_balance(line);
        self.parens += parens;
        self.braces += braces;
        if self.parens <= 0 && self.braces <= 0 {
            self.active = false;
            true
        } else {
            false
        }
    }

    /// Abandon the current block and return to Idle.
    pub fn reset(&mut self) {
        self.active = false;
        self.parens = 0;
        self.braces = 0;
    }
}
