use std::io::Write;

/// 日志级别的环境变量，例如 `PRISM_LOG=debug`
pub const LOG_ENV: &str = "PRISM_LOG";

/// 解析 `PRISM_LOG`，无法识别时回退到 info
fn level_from_env() -> log::LevelFilter {
    std::env::var(LOG_ENV).ok().and_then(|s| s.parse().ok()).unwrap_or(log::LevelFilter::Info)
}

pub fn init_log() {
    let result = env_logger::Builder::new()
        .format(|buf, record| {
            let info_style = buf
                .default_level_style(log::Level::Info)
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green)));
            let warn_style = buf
                .default_level_style(log::Level::Warn)
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));
            let error_style = buf
                .default_level_style(log::Level::Error)
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));

            let level_style = match record.level() {
                log::Level::Info => info_style,
                log::Level::Warn => warn_style,
                log::Level::Error => error_style,
                _ => buf.default_level_style(record.level()),
            };
            let grey_style = info_style.fg_color(Some(anstyle::Color::Rgb(anstyle::RgbColor(110, 110, 110))));

            let time = chrono::Local::now().format("%H:%M:%S");
            let level = record.level();
            // 只保留 crate 名，layout 相关的日志通常来自 schema / gen 两个 crate
            let target = record.target().split("::").next().unwrap_or("");

            writeln!(
                buf,
                "{level_style}[{time}] {level:<5}{level_style:#} {grey_style}[{target}]{grey_style:#} {}",
                record.args()
            )
        })
        .filter(None, level_from_env())
        .try_init();

    // 测试里可能被多次调用
    if result.is_err() {
        log::debug!("logger already initialized");
    }
}
