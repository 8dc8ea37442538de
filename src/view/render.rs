use super::ViewState;
use crate::models::{DashboardData, MonthFilter, PriceRangeCount, Statistics, Transaction};

/// HTML 转义
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 页面骨架
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; color: #1f2937; }}
        table {{ border-collapse: collapse; width: 100%; margin: 1rem 0; }}
        th, td {{ border: 1px solid #e5e7eb; padding: 0.4rem 0.6rem; text-align: left; }}
        .empty {{ color: #6b7280; text-align: center; }}
        .chart-placeholder {{ border: 1px dashed #9ca3af; padding: 1rem; }}
    </style>
</head>
<body>
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

pub fn error_page(message: &str) -> String {
    base_html(
        "Error",
        &format!("<h1>Error</h1><p>{}</p><p><a href='/'>Back</a></p>", escape_html(message)),
    )
}

/// 完整页面: 筛选栏、交易表格、分页、统计、柱状图数据
pub fn render_page(view: &ViewState, data: &DashboardData) -> String {
    let content = format!(
        "<h1>Transactions Table</h1>\n{}\n{}\n{}\n<h1>Transactions Statistics - {}</h1>\n{}\n<h1>Transactions Bar Chart - {}</h1>\n{}",
        filter_form(view),
        transactions_table(&data.transactions),
        pagination(view, data.total_matching),
        view.month.name(),
        statistics_block(&data.statistics),
        view.month.name(),
        bar_chart_block(&data.bar_chart),
    );
    base_html("Transactions Dashboard", &content)
}

fn filter_form(view: &ViewState) -> String {
    let options: String = MonthFilter::all()
        .map(|month| {
            let selected = if month == view.month { " selected" } else { "" };
            format!("<option value='{0}'{1}>{0}</option>", month.name(), selected)
        })
        .collect();

    let month_links: String = MonthFilter::all()
        .map(|month| {
            format!(
                "<a href='{}'>{}</a> ",
                escape_html(&view.with_month(month).href()),
                &month.name()[..3]
            )
        })
        .collect();
    let clear_search = if view.search_text.is_empty() {
        String::new()
    } else {
        format!(
            " <a href='{}'>Clear</a>",
            escape_html(&view.with_search("").href())
        )
    };

    format!(
        r#"<nav class="months">{}</nav>
<form method="get" action="/">
    <select name="month" onchange="this.form.submit()">{}</select>
    <input type="text" name="searchText" value="{}" placeholder="Search transactions...">
    <input type="hidden" name="page" value="{}">
    <button type="submit">Search</button>{}
</form>"#,
        month_links,
        options,
        escape_html(&view.search_text),
        view.page,
        clear_search
    )
}

fn transactions_table(rows: &[Transaction]) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>ID</th><th>Title</th><th>Description</th><th>Price</th><th>Category</th><th>Sold</th><th>Date</th></tr></thead><tbody>",
    );
    if rows.is_empty() {
        html.push_str("<tr><td colspan='7' class='empty'>No transactions found</td></tr>");
    }
    for tx in rows {
        let sold = match tx.sold {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "-",
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            tx.id,
            escape_html(&tx.title),
            escape_html(&tx.description),
            tx.price,
            escape_html(&tx.category),
            sold,
            tx.date_of_sale.format("%Y-%m-%d"),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn pagination(view: &ViewState, total_matching: i64) -> String {
    format!(
        "<div class='pagination'><a href='{}'>Previous</a> <span>Page {} ({} matching)</span> <a href='{}'>Next</a></div>",
        escape_html(&view.previous_page().href()),
        view.page,
        total_matching,
        escape_html(&view.next_page().href()),
    )
}

fn statistics_block(stats: &Statistics) -> String {
    format!(
        "<div>Total Sale Amount: {}</div>\n<div>Total Sold Items: {}</div>\n<div>Total Not Sold Items: {}</div>",
        stats.total_sale_amount, stats.total_sold_items, stats.total_not_sold_items
    )
}

// 图表绘制不在范围内, 仅列出区间数据
fn bar_chart_block(buckets: &[PriceRangeCount]) -> String {
    let rows: String = buckets
        .iter()
        .map(|b| format!("<tr><td>{}</td><td>{}</td></tr>", escape_html(&b.range), b.count))
        .collect();
    format!(
        "<div class='chart-placeholder' id='bar-chart'><table><thead><tr><th>Price Range</th><th>Items</th></tr></thead><tbody>{rows}</tbody></table></div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_sale_date, PRICE_BUCKET_COUNT};

    fn data(transactions: Vec<Transaction>) -> DashboardData {
        let mut counts = [0; PRICE_BUCKET_COUNT];
        counts[0] = transactions.len() as i64;
        DashboardData {
            total_matching: transactions.len() as i64,
            transactions,
            statistics: Statistics {
                total_sale_amount: 50.0,
                total_sold_items: 1,
                total_not_sold_items: 0,
            },
            bar_chart: PriceRangeCount::ladder(&counts),
        }
    }

    fn tx(title: &str) -> Transaction {
        Transaction {
            id: 1,
            title: title.to_string(),
            description: "desc".to_string(),
            price: 50.0,
            date_of_sale: parse_sale_date("2021-03-05").unwrap(),
            category: "x".to_string(),
            sold: Some(true),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn renders_rows_statistics_and_buckets() {
        let html = render_page(&ViewState::new(10), &data(vec![tx("<script>")]));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<td><script>"));
        assert!(html.contains("Total Sale Amount: 50"));
        assert!(html.contains("<td>0 - 100</td><td>1</td>"));
        assert!(html.contains("<td>901 - above</td><td>0</td>"));
        assert!(html.contains("<option value='March' selected>March</option>"));
    }

    #[test]
    fn renders_empty_state_and_page_links() {
        let view = ViewState::new(10).with_search("x y").next_page();
        let html = render_page(&view, &data(Vec::new()));
        assert!(html.contains("No transactions found"));
        assert!(html.contains("href='/?month=March&amp;searchText=x%20y&amp;page=1'"));
        assert!(html.contains("href='/?month=March&amp;searchText=x%20y&amp;page=3'"));
        assert!(html.contains("value=\"x y\""));
    }

    #[test]
    fn month_links_and_clear_search_keep_other_state() {
        let view = ViewState::new(10).with_search("bag").next_page();
        let html = render_page(&view, &data(Vec::new()));
        assert!(html.contains("<a href='/?month=June&amp;searchText=bag&amp;page=2'>Jun</a>"));
        assert!(html.contains("<a href='/?month=March&amp;page=2'>Clear</a>"));

        let plain = render_page(&ViewState::new(10), &data(Vec::new()));
        assert!(!plain.contains(">Clear</a>"));
    }
}
