pub mod hacker_news;
pub mod tech_rss;
