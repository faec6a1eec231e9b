use crate::utils::split_tokens;
use crate::SEPARATOR_WIDTH;

use super::table::render_plain_grid;
use super::CardBlocks;

fn generate_separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// 将一个块的行拆分为token矩阵
fn block_to_rows(lines: &[String]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|line| split_tokens(line).iter().map(|t| t.to_string()).collect())
        .collect()
}

/// 对单个块独立排版
fn tabulate(lines: &[String]) -> Vec<String> {
    render_plain_grid(&block_to_rows(lines))
}

/// header块原样输出（任意注释行，不做列对齐）
fn format_header_block(blocks: &CardBlocks, separators: bool) -> Vec<String> {
    let mut lines = blocks.header.clone();
    if separators {
        lines.push(generate_separator());
    }
    lines
}

/// shape块与bin块各自独立排版
fn format_shape_bin_blocks(blocks: &CardBlocks, separators: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for block in [&blocks.shape, &blocks.bin] {
        lines.extend(tabulate(block));
        if separators {
            lines.push(generate_separator());
        }
    }
    lines
}

/// process块与nuisance块联合排版
///
/// nuisance行比process行多一个类型标识列（如"lnN"），
/// 为保持数值列对齐，在每条process行的位置1插入一个占位单元格，
/// 渲染时占位单元格按该列宽度填充空白。
fn format_process_nuisance_blocks(blocks: &CardBlocks, separators: bool) -> Vec<String> {
    let mut merged = Vec::new();
    for line in &blocks.process {
        let mut row: Vec<String> = split_tokens(line).iter().map(|t| t.to_string()).collect();
        if !row.is_empty() {
            row.insert(1, String::new());
        }
        merged.push(row);
    }
    merged.extend(block_to_rows(&blocks.nuisance));

    let mut lines = render_plain_grid(&merged);

    // 合并块之后不再追加分隔线：nuisance块与param块直接相邻，
    // 多出的第五条分隔线会破坏"恰好四条分隔线"的卡格式
    if separators {
        lines.insert(blocks.process.len(), generate_separator());
    }
    lines
}

/// param块独立排版，块后不加分隔线
fn format_param_block(blocks: &CardBlocks) -> Vec<String> {
    tabulate(&blocks.param)
}

/// 将六个块重新组装为数据卡的全部行
///
/// 与[`split_lines`](super::split_lines)互为逆操作：
/// 对一张合法卡先切分再组装，逐行token等价（空白宽度与
/// 分隔线长度属于外观差异，不保证保留）。
pub fn blocks_to_lines(blocks: &CardBlocks, separators: bool) -> Vec<String> {
    let mut lines = format_header_block(blocks, separators);
    lines.extend(format_shape_bin_blocks(blocks, separators));
    lines.extend(format_process_nuisance_blocks(blocks, separators));
    lines.extend(format_param_block(blocks));
    lines
}
