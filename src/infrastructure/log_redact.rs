//! 日志脱敏
//! 助记词永不进入日志；地址只显示前后缀

/// 脱敏地址（显示前6位和后4位）
pub fn redact_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return "*".repeat(address.chars().count());
    }

    let prefix = &address[..6];
    let suffix = &address[address.len() - 4..];
    format!("{}...{}", prefix, suffix)
}

/// 助记词只记录单词数量
pub fn redact_mnemonic(mnemonic: &str) -> String {
    format!("<{} words>", mnemonic.split_whitespace().count())
}
