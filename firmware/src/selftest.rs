//! One-shot CPU instruction self-test.
//!
//! Runs at boot before the first frame. Every operand goes through
//! [`black_box`] so the checks execute on the CPU instead of being folded
//! into constants at build time.

use core::hint::black_box;
use core::ptr::{read_volatile, write_volatile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Arithmetic,
    Logical,
    Shifts,
    Compare,
    Memory,
    Branch,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Arithmetic,
        Category::Logical,
        Category::Shifts,
        Category::Compare,
        Category::Memory,
        Category::Branch,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::Arithmetic => "Arithmetic:",
            Category::Logical => "Logical:",
            Category::Shifts => "Shifts:",
            Category::Compare => "Compare:",
            Category::Memory => "Memory:",
            Category::Branch => "Branch:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryResult {
    pub category: Category,
    pub passed: u32,
    pub total: u32,
}

impl CategoryResult {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Outcome of [`run`]. Computed once, never updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTestResult {
    categories: [CategoryResult; 6],
}

impl SelfTestResult {
    pub fn categories(&self) -> &[CategoryResult] {
        &self.categories
    }

    pub fn get(&self, category: Category) -> CategoryResult {
        self.categories[category as usize]
    }

    pub fn passed(&self) -> u32 {
        self.categories.iter().map(|c| c.passed).sum()
    }

    pub fn total(&self) -> u32 {
        self.categories.iter().map(|c| c.total).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.total() > 0 && self.passed() == self.total()
    }
}

struct Tally {
    category: Category,
    passed: u32,
    total: u32,
}

impl Tally {
    fn new(category: Category) -> Self {
        Self {
            category,
            passed: 0,
            total: 0,
        }
    }

    fn check(&mut self, name: &str, ok: bool) {
        self.total += 1;
        if ok {
            self.passed += 1;
        } else {
            log::warn!("self-test {} failed", name);
        }
    }

    fn finish(self) -> CategoryResult {
        CategoryResult {
            category: self.category,
            passed: self.passed,
            total: self.total,
        }
    }
}

fn arithmetic() -> CategoryResult {
    let mut t = Tally::new(Category::Arithmetic);
    let a = black_box(100i32);
    let b = black_box(25i32);
    t.check("ADD", a.wrapping_add(b) == 125);
    t.check("SUB", a.wrapping_sub(b) == 75);
    t.check("MUL", a.wrapping_mul(b) == 2500);
    t.check("DIV", a.checked_div(b) == Some(4));
    t.check("REM", a.checked_rem(b) == Some(0));
    t.check("NEG", a.wrapping_neg() == -100);
    t.finish()
}

fn logical() -> CategoryResult {
    let mut t = Tally::new(Category::Logical);
    let a = black_box(0xFF00_FF00u32);
    let b = black_box(0x0F0F_0F0Fu32);
    t.check("AND", a & b == 0x0F00_0F00);
    t.check("OR", a | b == 0xFF0F_FF0F);
    t.check("XOR", a ^ b == 0xF00F_F00F);
    t.check("NOT", !a == 0x00FF_00FF);
    t.finish()
}

fn shifts() -> CategoryResult {
    let mut t = Tally::new(Category::Shifts);
    let a = black_box(0x8000_0001u32);
    let sa = black_box(-16i32);
    let by = black_box(4u32);
    t.check("SLL", a.wrapping_shl(by) == 0x0000_0010);
    t.check("SRL", a.wrapping_shr(by) == 0x0800_0000);
    t.check("SRA", sa >> black_box(2) == -4);
    t.finish()
}

fn compare() -> CategoryResult {
    let mut t = Tally::new(Category::Compare);
    let a = black_box(-5i32);
    let b = black_box(10i32);
    let ua = black_box(0xFFFF_FFFFu32);
    let ub = black_box(1u32);
    t.check("SLT", a < b);
    t.check("SGE", b >= a);
    t.check("SLTU", ub < ua);
    t.finish()
}

fn memory() -> CategoryResult {
    let mut t = Tally::new(Category::Memory);
    let mut word = 0u32;
    let mut half = 0u16;
    let mut byte = 0u8;
    // SAFETY: all three pointers come from live, aligned locals.
    let (w, h, b) = unsafe {
        write_volatile(&mut word, black_box(0xDEAD_BEEF));
        write_volatile(&mut half, black_box(0xCAFE));
        write_volatile(&mut byte, black_box(0x42));
        (read_volatile(&word), read_volatile(&half), read_volatile(&byte))
    };
    t.check("LW/SW", w == 0xDEAD_BEEF);
    t.check("LH/SH", h == 0xCAFE);
    t.check("LB/SB", b == 0x42);
    t.finish()
}

fn branch() -> CategoryResult {
    let mut t = Tally::new(Category::Branch);
    let a = black_box(5i32);
    let b = black_box(5i32);
    let c = black_box(10i32);

    let mut x = 0;
    if a == b {
        x = black_box(1);
    }
    t.check("BEQ", x == 1);

    x = 0;
    if a != c {
        x = black_box(1);
    }
    t.check("BNE", x == 1);

    x = 0;
    if a < c {
        x = black_box(1);
    }
    t.check("BLT", x == 1);

    x = 0;
    if c >= a {
        x = black_box(1);
    }
    t.check("BGE", x == 1);
    t.finish()
}

/// Run every category once.
pub fn run() -> SelfTestResult {
    let result = SelfTestResult {
        categories: [arithmetic(), logical(), shifts(), compare(), memory(), branch()],
    };
    log::info!("CPU self-test: {}/{} passed", result.passed(), result.total());
    result
}
