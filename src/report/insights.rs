//! Fixed wording of the report's insight sections.
//!
//! Headings, narrative and recommendations are data so the presenter can
//! be tested on section structure alone.

use crate::models::InsightId;

/// Constant text of one insight section.
#[derive(Debug, Clone, Copy)]
pub struct InsightTemplate {
    pub id: InsightId,
    pub heading: &'static str,
    pub narrative: &'static str,
    pub recommendations: &'static [&'static str],
}

/// All insights in report order.
pub const INSIGHTS: [InsightTemplate; 8] = [
    InsightTemplate {
        id: InsightId::FatContentShare,
        heading: "What is the affect of amount of fat present in food on sales?",
        narrative: "The pie chart shows the distribution of sales based on the fat content of items. \
            It indicates that 'Low Fat' items have a significant share of total sales, while 'Regular' \
            items have a smaller share. This suggests that consumers may prefer low-fat options, which \
            could be a valuable insight for product development and marketing strategies.",
        recommendations: &[
            "Consider expanding the range of Low Fat products or offering Low Fat alternatives to popular Regular items.",
            "Use this insight to target health-conscious marketing campaigns and promotions.",
            "Explore customer feedback or reviews for Regular products to understand potential barriers.",
        ],
    },
    InsightTemplate {
        id: InsightId::TopItemTypes,
        heading: "Which item types generate the highest sales across all outlets?",
        narrative: "The bar chart shows the total sales for each item type. It indicates that \
            \"Fruits and Vegetables\" generate the highest sales, followed by \"Snack Foods\" and \
            \"Household\" items. This insight can help in inventory management and marketing \
            strategies, focusing on high-selling categories.",
        recommendations: &[
            "Consider increasing inventory, promotions, or visibility for high-selling items to capitalize on demand.",
            "Investigate why certain categories like Seafood and Breakfast underperform; it could be due to supply chain issues, price sensitivity, or customer preferences.",
            "Use high-performing items as anchor products for cross-selling lower-performing categories.",
        ],
    },
    InsightTemplate {
        id: InsightId::FatContentByItemType,
        heading: "How does item fat content affect sales across item types?",
        narrative: "The bar chart shows the total sales for each item type, segmented by fat content. \
            It indicates that \"Low Fat\" items generally outperform \"Regular\" items across most \
            categories. This suggests a strong consumer preference for low-fat options, which could \
            inform product development and marketing strategies.",
        recommendations: &[
            "Businesses should expand Low Fat offerings in high-performing categories.",
            "For categories with strong Regular sales (like Baking Goods), maintain product variety while experimenting with healthier options.",
            "Marketing campaigns should emphasize Low Fat benefits especially in household essentials and snacks.",
        ],
    },
    InsightTemplate {
        id: InsightId::OutletAge,
        heading: "Are newer outlets performing better or worse than older ones?",
        narrative: "The line chart shows the total sales for each outlet establishment year. It \
            indicates that newer outlets (established in 2010 and later) generally outperform older \
            ones, suggesting that newer locations may be better positioned to meet customer needs or \
            have more effective marketing strategies.",
        recommendations: &[
            "While newer outlets (2010 to 2015) didn't outperform older ones, outlets opened after 2015 did significantly better, which might point to recent strategic improvements.",
            "Investigate what changed in 2020 (e.g., product mix, store size, location strategy, consumer trends).",
        ],
    },
    InsightTemplate {
        id: InsightId::OutletSizeAndType,
        heading: "How does outlet type or size influence sales performance?",
        narrative: "The first pie chart shows the distribution of sales based on outlet size. It \
            indicates that \"Medium\" and \"Small\" outlets have a significant share of total sales, \
            while \"High\" outlets have a smaller share, suggesting that smaller outlets may be more \
            effective in certain markets or product categories. The second pie chart shows the \
            distribution of sales based on outlet type: \"Supermarket Type1\" generates the highest \
            sales, followed by \"Grocery Store\" and \"Supermarket Type3\".",
        recommendations: &[
            "Consider expanding the number of Medium and Small outlets in high-performing areas.",
            "Consider increasing inventory, promotions, or visibility for high-selling outlet types to capitalize on demand.",
            "Investigate why certain outlet types underperform; it could be due to location, product mix, or customer preferences.",
            "Use high-performing outlet types as anchor locations for cross-selling lower-performing types.",
        ],
    },
    InsightTemplate {
        id: InsightId::LocationTier,
        heading: "Do certain outlet locations (Tier 1, Tier 2, Tier 3) see higher average sales?",
        narrative: "The pie chart shows the distribution of sales based on outlet location type. It \
            indicates that \"Tier 3\" locations generate the highest sales, followed by \"Tier 2\" and \
            \"Tier 1\". The bar chart compares the average sale per item in each tier. This insight \
            can help in inventory management and marketing strategies, focusing on high-selling \
            outlet locations.",
        recommendations: &[
            "Consider increasing inventory, promotions, or visibility for high-selling outlet locations to capitalize on demand.",
            "Investigate why certain outlet locations underperform; it could be due to location, product mix, or customer preferences.",
            "Use high-performing outlet locations as anchor locations for cross-selling lower-performing locations.",
        ],
    },
    InsightTemplate {
        id: InsightId::WeightCorrelation,
        heading: "Does item weight have any correlation with sales?",
        narrative: "The correlation coefficient indicates a weak positive correlation between item \
            weight and sales, suggesting that heavier items may not necessarily lead to higher sales. \
            This insight can inform product development and marketing strategies.",
        recommendations: &[],
    },
    InsightTemplate {
        id: InsightId::SizeTypeCombination,
        heading: "Which combination of outlet size and type yields the best sales results?",
        narrative: "The bar chart shows the total sales for each outlet type, segmented by outlet \
            size. It indicates that \"Supermarket Type1\" and \"Medium\" outlets generate the highest \
            sales, while \"Supermarket Type3\" and \"Small\" outlets have lower sales. This suggests \
            that certain combinations of outlet type and size may be more effective in driving sales.",
        recommendations: &[],
    },
];
