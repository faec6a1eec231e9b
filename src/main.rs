use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use datacard_manager::utils::{compare_cards, create_backup};
use datacard_manager::CardManager;

#[derive(Parser)]
#[command(name = "datacard_manager")]
#[command(about = "解析、编辑并重排combine格式的数据卡")]
#[command(version)]
struct Cli {
    /// 输入数据卡文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输出数据卡文件路径（给定时写出编辑结果）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 移除匹配的过程（可重复，名称或正则）
    #[arg(long)]
    drop_process: Vec<String>,

    /// 移除名称匹配正则的不确定度行（可重复）
    #[arg(long)]
    drop_uncertainty: Vec<String>,

    /// 信号过程旧名称（逗号分隔，与--rename-to配对）
    #[arg(long, value_delimiter = ',')]
    rename_from: Vec<String>,

    /// 信号过程新名称（逗号分隔；比旧名称少时，多出的旧过程被移除）
    #[arg(long, value_delimiter = ',')]
    rename_to: Vec<String>,

    /// 将workspace文件引用改写为绝对路径
    #[arg(long)]
    absolute_paths: bool,

    /// 将workspace文件引用改写为纯文件名
    #[arg(long)]
    basename_paths: bool,

    /// 写出时将引用的workspace文件一并拷贝到输出目录
    #[arg(long)]
    copy_workspace_files: bool,

    /// 显示数据卡统计信息
    #[arg(long)]
    stats: bool,

    /// 将nuisance效应模型导出为JSON文件
    #[arg(long)]
    export_nuisances: Option<PathBuf>,

    /// 与另一张卡做忽略格式差异的比较
    #[arg(long)]
    compare_with: Option<PathBuf>,

    /// 覆盖已存在的输出文件前创建备份
    #[arg(long)]
    backup: bool,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    validate_input(&cli)?;

    if let Some(other) = &cli.compare_with {
        return handle_card_comparison(&cli, other);
    }

    let mut manager = CardManager::new(&cli.input)
        .with_context(|| format!("加载数据卡失败: {:?}", cli.input))?;

    if cli.stats {
        handle_stats(&manager)?;
    }

    if let Some(target) = &cli.export_nuisances {
        handle_nuisance_export(&cli, &manager, target)?;
    }

    apply_edits(&cli, &mut manager)?;

    if let Some(output) = &cli.output {
        handle_write(&cli, &mut manager, output)?;
    }

    Ok(())
}

/// 验证输入参数
fn validate_input(cli: &Cli) -> Result<()> {
    if !cli.input.exists() {
        bail!("输入文件不存在: {:?}", cli.input);
    }

    if cli.rename_from.len() < cli.rename_to.len() {
        bail!(
            "--rename-to 提供了{}个新名称，但--rename-from 只有{}个旧名称",
            cli.rename_to.len(),
            cli.rename_from.len()
        );
    }

    if cli.absolute_paths && cli.basename_paths {
        bail!("--absolute-paths 与 --basename-paths 只能使用其一");
    }

    if cli.copy_workspace_files && cli.output.is_none() {
        bail!("--copy-workspace-files 需要同时给定 --output");
    }

    Ok(())
}

/// 处理卡比较模式
fn handle_card_comparison(cli: &Cli, other: &PathBuf) -> Result<()> {
    let equivalent = compare_cards(&cli.input, other)
        .with_context(|| format!("比较数据卡失败: {:?} / {:?}", cli.input, other))?;

    if equivalent {
        if !cli.quiet {
            println!("两张卡等价（忽略格式差异）");
        }
        Ok(())
    } else {
        bail!("两张卡内容不一致");
    }
}

/// 处理统计信息显示
fn handle_stats(manager: &CardManager) -> Result<()> {
    let stats = manager.stats()?;
    print!("{}", stats);
    Ok(())
}

/// 处理nuisance效应模型的JSON导出
fn handle_nuisance_export(cli: &Cli, manager: &CardManager, target: &PathBuf) -> Result<()> {
    let reports: Vec<_> = manager
        .nuisances
        .iter()
        .map(|nuisance| nuisance.report())
        .collect();

    let json = serde_json::to_string_pretty(&reports)?;
    std::fs::write(target, json)
        .with_context(|| format!("写入JSON文件失败: {:?}", target))?;

    if !cli.quiet {
        println!("已导出{}个nuisance到: {:?}", reports.len(), target);
    }
    Ok(())
}

/// 按命令行参数依次应用编辑操作
fn apply_edits(cli: &Cli, manager: &mut CardManager) -> Result<()> {
    if !cli.rename_from.is_empty() {
        manager
            .rename_signal_processes(&cli.rename_to, &cli.rename_from)
            .context("重命名信号过程失败")?;
        if !cli.quiet {
            println!("已重命名{}个信号过程", cli.rename_to.len().min(cli.rename_from.len()));
        }
    }

    for pattern in &cli.drop_process {
        manager
            .drop_process(pattern)
            .with_context(|| format!("移除过程失败: {}", pattern))?;
        if !cli.quiet {
            println!("已移除过程: {}", pattern);
        }
    }

    for pattern in &cli.drop_uncertainty {
        let removed = manager
            .drop_uncertainty(pattern)
            .with_context(|| format!("移除不确定度失败: {}", pattern))?;
        if !cli.quiet {
            println!("已移除{}条不确定度行: {}", removed, pattern);
        }
    }

    if cli.absolute_paths {
        manager.make_paths_absolute().context("改写绝对路径失败")?;
    }
    if cli.basename_paths {
        manager.make_paths_basename().context("改写文件名失败")?;
    }

    Ok(())
}

/// 处理卡写出
fn handle_write(cli: &Cli, manager: &mut CardManager, output: &PathBuf) -> Result<()> {
    if cli.backup && output.exists() {
        let backup_path = create_backup(output)?;
        if !cli.quiet {
            println!("已创建备份: {:?}", backup_path);
        }
    }

    manager
        .write(output, cli.copy_workspace_files)
        .with_context(|| format!("写出数据卡失败: {:?}", output))?;

    if !cli.quiet {
        println!("已写出数据卡: {:?}", output);
    }
    Ok(())
}
