pub mod card;
pub mod format;
pub mod io;
pub mod model;
pub mod stats;
pub mod utils;

// 重新导出主要结构
pub use card::{CardManager, NewProcess};
pub use format::{BlockName, CardBlocks};
pub use io::{CardReader, CardWriter, DefaultCardReader, DefaultCardWriter};
pub use model::{Nuisance, NuisanceCollection, Process, NO_EFFECT};
pub use stats::CardStats;
pub use utils::CardError;

// 常量定义
pub const WORKSPACE_EXTENSION: &str = "root";
pub const SEPARATOR_WIDTH: usize = 20;
