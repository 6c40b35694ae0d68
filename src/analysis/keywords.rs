use std::fmt;

use serde::Serialize;

/// One of the instruction names counted in an LLVM IR listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Load,
    Store,
    Add,
    Sub,
    Mul,
    Div,
    Icmp,
    Fcmp,
    Call,
    Ret,
}

impl Keyword {
    pub const COUNT: usize = 10;

    /// Canonical order. Keywords found on the same line are credited in this order.
    pub const ALL: [Keyword; Keyword::COUNT] = [
        Keyword::Load,
        Keyword::Store,
        Keyword::Add,
        Keyword::Sub,
        Keyword::Mul,
        Keyword::Div,
        Keyword::Icmp,
        Keyword::Fcmp,
        Keyword::Call,
        Keyword::Ret,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Load => "load",
            Keyword::Store => "store",
            Keyword::Add => "add",
            Keyword::Sub => "sub",
            Keyword::Mul => "mul",
            Keyword::Div => "div",
            Keyword::Icmp => "icmp",
            Keyword::Fcmp => "fcmp",
            Keyword::Call => "call",
            Keyword::Ret => "ret",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Keyword::Load => "Read from memory",
            Keyword::Store => "Write to memory",
            Keyword::Add => "Integer addition",
            Keyword::Sub => "Integer subtraction",
            Keyword::Mul => "Integer multiplication",
            Keyword::Div => "Integer division",
            Keyword::Icmp => "Integer comparison",
            Keyword::Fcmp => "Floating point comparison",
            Keyword::Call => "Function call",
            Keyword::Ret => "Return from function",
        }
    }

    /// Cycles charged per occurrence when no configuration overrides it.
    pub fn default_weight(self) -> u64 {
        match self {
            Keyword::Load | Keyword::Store => 3,
            Keyword::Mul => 2,
            Keyword::Div => 4,
            Keyword::Call => 5,
            Keyword::Add | Keyword::Sub | Keyword::Icmp | Keyword::Fcmp | Keyword::Ret => 1,
        }
    }

    /// Charged the memory latency overhead.
    pub fn is_memory_access(self) -> bool {
        matches!(self, Keyword::Load | Keyword::Store)
    }

    /// Charged the branch penalty overhead.
    pub fn is_branch(self) -> bool {
        matches!(self, Keyword::Call | Keyword::Ret)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Word-boundary alternation over every keyword, e.g. `\b(load|store|...)\b`.
pub fn keyword_pattern() -> String {
    let names: Vec<&str> = Keyword::ALL.iter().map(|k| k.as_str()).collect();
    format!(r"\b({})\b", names.join("|"))
}

/// Cycles per instruction for every keyword. Always total over the keyword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightTable {
    weights: [u64; Keyword::COUNT],
}

impl WeightTable {
    pub fn get(&self, keyword: Keyword) -> u64 {
        self.weights[keyword.index()]
    }

    pub fn set(&mut self, keyword: Keyword, weight: u64) {
        self.weights[keyword.index()] = weight;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Keyword, u64)> + '_ {
        Keyword::ALL.into_iter().map(|k| (k, self.get(k)))
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            weights: Keyword::ALL.map(Keyword::default_weight),
        }
    }
}
