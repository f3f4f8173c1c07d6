use crate::config::EndpointConfig;
use crate::fetch::{base_symbol, CoinSummary};

use super::format::{format_price, format_volume, BadgeText};

pub const PAIR_LABEL: &str = "USDT Pair";
pub const LOADING_MESSAGE: &str = "Loading top cryptocurrencies...";
pub const EMPTY_MESSAGE: &str = "No coins data received";

/// Icon locations keyed by lower-cased base symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSet {
    base: String,
    fallback: String,
}

impl IconSet {
    pub fn new(base: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            fallback: fallback.into(),
        }
    }

    pub fn from_endpoints(endpoints: &EndpointConfig) -> Self {
        Self::new(&endpoints.icon_base, &endpoints.icon_fallback)
    }

    pub fn url_for(&self, symbol: &str) -> String {
        format!(
            "{}/{}.png",
            self.base.trim_end_matches('/'),
            symbol.to_lowercase()
        )
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Fixed card template for one coin.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinCard {
    pub symbol: String,
    pub pair_label: &'static str,
    pub icon_url: String,
    pub icon_fallback: String,
    pub detail_path: String,
    pub price: String,
    pub change: BadgeText,
    pub volume: String,
}

impl CoinCard {
    pub fn build(coin: &CoinSummary, icons: &IconSet) -> Self {
        let symbol = base_symbol(&coin.symbol).to_uppercase();
        Self {
            icon_url: icons.url_for(&symbol),
            icon_fallback: icons.fallback().to_string(),
            detail_path: format!("/coin/{}", symbol.to_lowercase()),
            price: format_price(coin.price),
            change: BadgeText::change(coin.price_change_percent),
            volume: format!("24h Volume: {}", format_volume(coin.volume)),
            pair_label: PAIR_LABEL,
            symbol,
        }
    }
}

/// Everything a card container can show; swapped as one value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContainerContent {
    #[default]
    Blank,
    Loading(String),
    Cards(Vec<CoinCard>),
    Empty(String),
    Error { message: String, retry: bool },
}

#[derive(Debug, Default)]
pub struct CardContainer {
    content: ContainerContent,
    replacements: u64,
}

impl CardContainer {
    pub fn content(&self) -> &ContainerContent {
        &self.content
    }

    pub fn cards(&self) -> &[CoinCard] {
        match &self.content {
            ContainerContent::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    pub fn replace(&mut self, content: ContainerContent) {
        self.content = content;
        self.replacements += 1;
    }

    /// Show the spinner unless a loading placeholder is already up.
    pub fn show_loading(&mut self) {
        if !matches!(self.content, ContainerContent::Loading(_)) {
            self.replace(ContainerContent::Loading(LOADING_MESSAGE.to_string()));
        }
    }
}

/// Build every card first, then swap the container contents in one step.
///
/// Cards keep the order of `coins`.
pub fn render_list(container: &mut CardContainer, coins: &[CoinSummary], icons: &IconSet) {
    if coins.is_empty() {
        container.replace(ContainerContent::Empty(EMPTY_MESSAGE.to_string()));
        return;
    }

    let cards = coins
        .iter()
        .map(|coin| CoinCard::build(coin, icons))
        .collect();
    container.replace(ContainerContent::Cards(cards));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::format::Badge;

    fn icons() -> IconSet {
        let endpoints = EndpointConfig::default();
        IconSet::from_endpoints(&endpoints)
    }

    fn coin(symbol: &str, volume: f64, change: f64) -> CoinSummary {
        CoinSummary {
            symbol: symbol.to_string(),
            price: 1.5,
            volume,
            price_change_percent: change,
        }
    }

    #[test]
    fn preserves_input_order_of_nine_usdt_pairs() {
        let symbols = [
            "BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT", "DOGEUSDT", "BNBUSDT", "ADAUSDT",
            "TRXUSDT", "LINKUSDT",
        ];
        let coins: Vec<CoinSummary> = symbols
            .iter()
            .enumerate()
            .map(|(idx, symbol)| coin(symbol, 1_000.0 - idx as f64 * 10.0, 1.0))
            .collect();

        let mut container = CardContainer::default();
        render_list(&mut container, &coins, &icons());

        let rendered: Vec<&str> = container.cards().iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(
            rendered,
            ["BTC", "ETH", "SOL", "XRP", "DOGE", "BNB", "ADA", "TRX", "LINK"]
        );
        assert_eq!(container.replacements(), 1);
    }

    #[test]
    fn renderer_does_not_resort() {
        let coins = vec![coin("AUSDT", 1.0, 0.0), coin("BUSDT", 100.0, 0.0)];
        let mut container = CardContainer::default();
        render_list(&mut container, &coins, &icons());

        assert_eq!(container.cards()[0].symbol, "A");
        assert_eq!(container.cards()[1].symbol, "B");
    }

    #[test]
    fn badge_class_follows_sign_of_change() {
        let coins = vec![
            coin("UPUSDT", 1.0, 2.5),
            coin("FLATUSDT", 1.0, 0.0),
            coin("DOWNUSDT", 1.0, -0.01),
        ];
        let mut container = CardContainer::default();
        render_list(&mut container, &coins, &icons());

        let badges: Vec<Badge> = container.cards().iter().map(|c| c.change.badge).collect();
        assert_eq!(badges, [Badge::Positive, Badge::Positive, Badge::Negative]);
        assert_eq!(container.cards()[1].change.text, "+0.00%");
    }

    #[test]
    fn card_uses_icon_and_detail_links() {
        let card = CoinCard::build(&coin("BTCUSDT", 1_234_567.8, 1.0), &icons());

        assert!(card.icon_url.ends_with("/128/color/btc.png"), "{}", card.icon_url);
        assert!(card.icon_fallback.ends_with("generic.png"));
        assert_eq!(card.detail_path, "/coin/btc");
        assert_eq!(card.price, "$1.50");
        assert_eq!(card.volume, "24h Volume: $1,234,568");
        assert_eq!(card.pair_label, PAIR_LABEL);
    }

    #[test]
    fn empty_list_shows_empty_state() {
        let mut container = CardContainer::default();
        container.show_loading();
        render_list(&mut container, &[], &icons());

        assert_eq!(
            container.content(),
            &ContainerContent::Empty(EMPTY_MESSAGE.to_string())
        );
        assert!(container.cards().is_empty());
    }

    #[test]
    fn loading_placeholder_is_not_stacked() {
        let mut container = CardContainer::default();
        container.show_loading();
        container.show_loading();
        assert_eq!(container.replacements(), 1);
    }
}
