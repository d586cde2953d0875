//! Page renderer
//!
//! Renders the catalog and search pages as HTML and the patron status
//! report as plain text.

use crate::app::PatronStatus;
use crate::domain::entities::{Book, SearchField};

/// Render the catalog page
pub fn render_catalog(books: &[Book]) -> String {
    let mut body = String::new();

    body.push_str("<h1>Book Catalog</h1>\n");
    body.push_str("<p><a href=\"/search\">Search</a></p>\n");

    if books.is_empty() {
        body.push_str("<div class=\"empty\">\n");
        body.push_str("  <p>No books in catalog</p>\n");
        body.push_str("  <p>Add New Book using <code>POST /books</code>.</p>\n");
        body.push_str("</div>\n");
    } else {
        body.push_str(&render_book_table(books));
    }

    page("Book Catalog", &body)
}

/// Render the search page
///
/// `results` is `None` before a query has been submitted.
pub fn render_search(query: Option<&str>, field: SearchField, results: Option<&[Book]>) -> String {
    let mut body = String::new();

    body.push_str("<h1>Search Books</h1>\n");
    body.push_str(&render_search_form(query.unwrap_or(""), field));

    if let Some(results) = results {
        if results.is_empty() {
            body.push_str(&format!(
                "<p class=\"empty\">No books found for \"{}\".</p>\n",
                escape(query.unwrap_or(""))
            ));
        } else {
            body.push_str(&format!(
                "<p>{} result{} for \"{}\"</p>\n",
                results.len(),
                if results.len() == 1 { "" } else { "s" },
                escape(query.unwrap_or(""))
            ));
            body.push_str(&render_book_table(results));
        }
    }

    body.push_str("<p><a href=\"/catalog\">Back to catalog</a></p>\n");

    page("Search Books", &body)
}

fn render_search_form(query: &str, field: SearchField) -> String {
    let option = |value: SearchField, label: &str| {
        format!(
            "<option value=\"{}\"{}>{}</option>",
            value,
            if value == field { " selected" } else { "" },
            label
        )
    };

    format!(
        "<form method=\"get\" action=\"/search\">\n  \
         <input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"Search...\">\n  \
         <select name=\"type\">{}{}{}</select>\n  \
         <button type=\"submit\">Search</button>\n\
         </form>\n",
        escape(query),
        option(SearchField::Title, "Title"),
        option(SearchField::Author, "Author"),
        option(SearchField::Isbn, "ISBN"),
    )
}

fn render_book_table(books: &[Book]) -> String {
    let mut buf = String::new();

    buf.push_str("<table>\n");
    buf.push_str(
        "  <thead><tr><th>ID</th><th>Title</th><th>Author</th><th>ISBN</th>\
         <th>Availability</th><th>Actions</th></tr></thead>\n",
    );
    buf.push_str("  <tbody>\n");
    for book in books {
        buf.push_str(&render_book_row(book));
    }
    buf.push_str("  </tbody>\n");
    buf.push_str("</table>\n");

    buf
}

fn render_book_row(book: &Book) -> String {
    let action = if book.is_available() {
        format!(
            "<form method=\"post\" action=\"/borrow\">\
             <input type=\"hidden\" name=\"book_id\" value=\"{}\">\
             <input type=\"text\" name=\"patron_id\" placeholder=\"Patron ID\" \
             pattern=\"[0-9]{{6}}\" maxlength=\"6\" required>\
             <button type=\"submit\">Borrow</button></form>",
            book.id
        )
    } else {
        String::new()
    };

    format!(
        "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        book.id,
        escape(&book.title),
        escape(&book.author),
        escape(&book.isbn),
        book.availability_label(),
        action
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} - Library</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Escape text for HTML element content and quoted attributes
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a patron status report
pub fn render_patron_status(status: &PatronStatus) -> String {
    let mut buf = String::new();

    buf.push_str(&format!("# Patron {}\n\n", status.patron_id));

    buf.push_str(&format!(
        "Currently borrowed: {}\n",
        status.currently_borrowed_count
    ));
    buf.push_str(&format!(
        "Total late fees owed: ${:.2}\n\n",
        status.total_late_fees_owed
    ));

    buf.push_str("## Currently Borrowed\n\n");
    if status.currently_borrowed.is_empty() {
        buf.push_str("_Nothing checked out._\n");
    }
    for loan in &status.currently_borrowed {
        let overdue = if loan.days_overdue > 0 {
            format!(
                " | OVERDUE {} day(s), fee ${:.2}",
                loan.days_overdue, loan.late_fee
            )
        } else {
            String::new()
        };
        buf.push_str(&format!(
            "- [{}] {} by {} | borrowed {} | due {}{}\n",
            loan.book_id, loan.title, loan.author, loan.borrow_date, loan.due_date, overdue
        ));
    }

    buf.push_str("\n## Borrowing History\n\n");
    if status.borrowing_history.is_empty() {
        buf.push_str("_No borrowing history._\n");
    }
    for entry in &status.borrowing_history {
        let returned = match (entry.return_date, entry.fee_charged) {
            (Some(date), Some(fee)) if !fee.is_zero() => {
                format!("returned {} (fee ${:.2})", date, fee)
            }
            (Some(date), _) => format!("returned {}", date),
            (None, _) => "not returned".to_string(),
        };
        buf.push_str(&format!(
            "- [{}] {} by {} | borrowed {} | due {} | {}\n",
            entry.book_id, entry.title, entry.author, entry.borrow_date, entry.due_date, returned
        ));
    }

    buf
}
