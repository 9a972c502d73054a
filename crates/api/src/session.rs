//! # 会话卡片顺序
//!
//! 卡片顺序保存在浏览器的 `orbitdeck_layout` Cookie 里，服务端不保留任何会话状态。
//! Cookie 值是以 `.` 连接的卡片名，例如 `news.weather.stocks`。

use orbitdeck_core::layout::{CardId, CardLayout};

/// 卡片顺序 Cookie 名称
pub const LAYOUT_COOKIE: &str = "orbitdeck_layout";

// 一年
const LAYOUT_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

// Cookie 值中不允许出现逗号
const ORDER_SEPARATOR: &str = ".";

/// # Summary
/// 从 `Cookie` 请求头中读取卡片顺序。
///
/// # Logic
/// 1. 按 `;` 拆分键值对，找到名为 `orbitdeck_layout` 的项。
/// 2. 按分隔符拆出卡片名，交给 `CardLayout::from_names` 校验。
///
/// # Returns
/// Cookie 缺失或内容不是完整排列时返回 None。
pub fn layout_from_cookie_header(header: &str) -> Option<CardLayout> {
    let (_, value) = header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == LAYOUT_COOKIE)?;
    let names: Vec<&str> = value.trim().split(ORDER_SEPARATOR).collect();
    CardLayout::from_names(&names)
}

/// 保存卡片顺序的 `Set-Cookie` 值
pub fn layout_cookie(layout: &CardLayout) -> String {
    let order = layout
        .cards()
        .iter()
        .map(CardId::as_str)
        .collect::<Vec<_>>()
        .join(ORDER_SEPARATOR);
    format!(
        "{LAYOUT_COOKIE}={order}; Path=/; Max-Age={LAYOUT_COOKIE_MAX_AGE_SECS}; HttpOnly; SameSite=Lax"
    )
}

/// 清除卡片顺序的 `Set-Cookie` 值，浏览器随后回到默认顺序
pub fn clear_layout_cookie() -> String {
    format!("{LAYOUT_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_lookup() {
        let header = format!("theme=dark; {LAYOUT_COOKIE}=news.weather.stocks; other=1");
        let layout = layout_from_cookie_header(&header).unwrap();
        assert_eq!(layout.cards(), &[CardId::News, CardId::Weather, CardId::Stocks]);
        assert!(layout_from_cookie_header("").is_none());
        assert!(layout_from_cookie_header("theme=dark").is_none());
    }

    #[test]
    fn test_tampered_cookie_is_ignored() {
        for value in ["news.weather", "news.news.stocks", "news.weather.stocks.moon", ""] {
            let header = format!("{LAYOUT_COOKIE}={value}");
            assert!(layout_from_cookie_header(&header).is_none(), "{value}");
        }
    }

    #[test]
    fn test_cookie_round_trips_layout() {
        let layout = CardLayout::from_names(&["stocks", "news", "weather"]).unwrap();
        let set_cookie = layout_cookie(&layout);
        assert!(set_cookie.starts_with("orbitdeck_layout=stocks.news.weather;"));
        assert!(set_cookie.contains("HttpOnly"));

        let (pair, _) = set_cookie.split_once(';').unwrap();
        assert_eq!(layout_from_cookie_header(pair), Some(layout));
        assert!(clear_layout_cookie().contains("Max-Age=0"));
    }
}
