pub mod formatter;

pub use formatter::{
    format_blog_list, format_faq_list, format_fee_report, format_locations, format_manager_detail,
    format_manager_table, format_page_meta, format_score_breakdown, should_use_colors,
};
