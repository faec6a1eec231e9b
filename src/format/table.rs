/// 纯文本对齐表格渲染
///
/// 按列最大宽度左对齐排版token矩阵，列间以两个空格分隔，
/// 行尾空白会被去除。空单元格渲染为等宽的空白填充。
pub fn render_plain_grid(rows: &[Vec<String>]) -> Vec<String> {
    let column_count = rows.iter().map(|row| row.len()).max().unwrap_or(0);

    let mut widths = vec![0usize; column_count];
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (index, cell) in row.iter().enumerate() {
                if index > 0 {
                    line.push_str("  ");
                }
                line.push_str(cell);
                if index + 1 < row.len() {
                    for _ in cell.chars().count()..widths[index] {
                        line.push(' ');
                    }
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_column_alignment() {
        let rows = vec![row(&["bin", "monojet"]), row(&["process", "zh"])];
        let lines = render_plain_grid(&rows);
        assert_eq!(lines[0], "bin      monojet");
        assert_eq!(lines[1], "process  zh");
    }

    #[test]
    fn test_empty_cell_pads_column() {
        let rows = vec![row(&["rate", "", "10.0"]), row(&["jer", "lnN", "1"])];
        let lines = render_plain_grid(&rows);
        assert_eq!(lines[0], "rate       10.0");
        assert_eq!(lines[1], "jer   lnN  1");
    }

    #[test]
    fn test_ragged_rows() {
        let rows = vec![row(&["a", "b", "c"]), row(&["longer"])];
        let lines = render_plain_grid(&rows);
        assert_eq!(lines[0], "a       b  c");
        assert_eq!(lines[1], "longer");
    }
}
