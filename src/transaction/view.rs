//! HTML rendering for the transactions page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    currency::CURRENCIES,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base,
    },
    navigation::NavBar,
    pagination::PaginationIndicator,
};

use super::{
    core::{Category, EXPENSE_CATEGORIES, INCOME_CATEGORIES, TransactionKind},
    models::{FilterFormModel, IndicatorLink, LedgerViewModel, TransactionRow},
    range::DATE_PRESETS,
    sort::{SortKey, SortOrder},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
        TransactionKind::Income => "text-green-700 dark:text-green-300",
    }
}

fn truncate_description(description: &str) -> String {
    let graphemes: Vec<&str> = description.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_owned()
    } else {
        format!("{}…", graphemes[..MAX_DESCRIPTION_GRAPHEMES].concat())
    }
}

pub(crate) fn transactions_view(model: LedgerViewModel) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Create Transaction"
                    }
                }

                (filter_controls(&model.filters))

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden p-4 space-y-2"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Showing " (model.filtered_count) " of " (model.total_count) " transactions"
                    }

                    (totals_line("Expenses", &model.expense_totals, true))
                    (totals_line("Income", &model.income_totals, false))
                }

                (ledger_table(&model))

                (pagination_nav(&model.indicators))
            }
        }
    };

    base("Transactions", &content)
}

fn totals_line(label: &str, totals: &[String], is_expense: bool) -> Markup {
    html! {
        p class="text-sm" data-expense-totals[is_expense] data-income-totals[!is_expense]
        {
            span class="font-semibold" { (label) ": " }

            @if totals.is_empty() {
                span class="text-gray-400" { "none" }
            } @else {
                @for (i, total) in totals.iter().enumerate() {
                    @if i > 0 { " · " }
                    (total)
                }
            }
        }
    }
}

fn filter_controls(filters: &FilterFormModel) -> Markup {
    html! {
        form method="get" action=(endpoints::TRANSACTIONS_VIEW)
            class="rounded bg-gray-50 dark:bg-gray-800 p-4 space-y-4"
        {
            h2 class="text-lg font-semibold" { "Filters" }

            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                div
                {
                    label for="range" class=(FORM_LABEL_STYLE) { "Date Range" }
                    select name="range" id="range" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for preset in DATE_PRESETS {
                            option
                                value=(preset.as_query_value())
                                selected[preset == filters.preset]
                            {
                                (preset.label())
                            }
                        }
                    }
                }

                div
                {
                    label for="start" class=(FORM_LABEL_STYLE) { "Start Date" }
                    input
                        type="date"
                        name="start"
                        id="start"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=[filters.start.map(|date| date.to_string())];
                }

                div
                {
                    label for="end" class=(FORM_LABEL_STYLE) { "End Date" }
                    input
                        type="date"
                        name="end"
                        id="end"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=[filters.end.map(|date| date.to_string())];
                }
            }

            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="all" selected[filters.category_value == "all"]
                        {
                            "All Categories"
                        }

                        optgroup label="Expenses"
                        {
                            @for category in EXPENSE_CATEGORIES {
                                @let value = Category::Expense(category).as_query_value();
                                option value=(value) selected[filters.category_value == value]
                                {
                                    (category.label())
                                }
                            }
                        }

                        optgroup label="Income"
                        {
                            @for category in INCOME_CATEGORIES {
                                @let value = Category::Income(category).as_query_value();
                                option value=(value) selected[filters.category_value == value]
                                {
                                    (category.label())
                                }
                            }
                        }
                    }
                }

                div
                {
                    label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }
                    select name="currency" id="currency" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="all" selected[filters.currency_value == "all"]
                        {
                            "All Currencies"
                        }

                        @for currency in CURRENCIES {
                            option
                                value=(currency.code())
                                selected[filters.currency_value == currency.code()]
                            {
                                (currency.code())
                            }
                        }
                    }
                }

                div
                {
                    label for="account" class=(FORM_LABEL_STYLE) { "Account" }
                    select name="account" id="account" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="all" selected[filters.account_value == "all"]
                        {
                            "All Accounts"
                        }

                        @for account in &filters.accounts {
                            @let value = account.id.to_string();
                            option value=(value) selected[filters.account_value == value]
                            {
                                (account.name)
                            }
                        }
                    }
                }
            }

            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                div
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Search Description" }
                    input
                        type="text"
                        name="search"
                        id="search"
                        placeholder="Search transactions..."
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(filters.search);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    select name="amount" id="amount" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="all" selected[filters.amount_mode == "all"]
                        {
                            "Any Amount"
                        }
                        option value="more-than" selected[filters.amount_mode == "more-than"]
                        {
                            "More Than"
                        }
                        option value="less-than" selected[filters.amount_mode == "less-than"]
                        {
                            "Less Than"
                        }
                    }
                }

                div
                {
                    label for="amount_value" class=(FORM_LABEL_STYLE) { "Amount Value" }
                    input
                        type="number"
                        name="amount_value"
                        id="amount_value"
                        step="0.01"
                        min="0"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=[filters.amount_value];
                }
            }

            div class="flex gap-4 items-center"
            {
                button
                    type="submit"
                    class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                        hover:dark:bg-blue-700 text-white rounded"
                {
                    "Apply Filters"
                }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Reset" }
            }
        }
    }
}

fn sort_arrow(
    column: SortKey,
    active_key: SortKey,
    active_order: SortOrder,
) -> &'static str {
    if column != active_key {
        ""
    } else if active_order == SortOrder::Descending {
        " ▼"
    } else {
        " ▲"
    }
}

fn ledger_table(model: &LedgerViewModel) -> Markup {
    html! {
        form method="post" action=(endpoints::DELETE_SELECTED_TRANSACTIONS)
        {
            div class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
            {
                table class="w-full my-2 text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class="px-6 py-3"
                            {
                                input
                                    type="checkbox"
                                    data-select-all
                                    checked[model.all_on_page_selected]
                                    onclick="toggleAllRows(this)";
                            }

                            th scope="col" class="px-6 py-3"
                            {
                                a href=(model.date_sort_url)
                                {
                                    "Date" (sort_arrow(SortKey::Date, model.sort_key, model.sort_order))
                                }
                            }

                            th scope="col" class="px-6 py-3" { "Description" }
                            th scope="col" class="px-6 py-3" { "Category" }
                            th scope="col" class="px-6 py-3" { "Account" }

                            th scope="col" class="px-6 py-3 text-right"
                            {
                                a href=(model.amount_sort_url)
                                {
                                    "Amount" (sort_arrow(SortKey::Amount, model.sort_key, model.sort_order))
                                }
                            }

                            th scope="col" class="px-6 py-3" { "Actions" }
                        }
                    }

                    tbody
                    {
                        @if model.rows.is_empty() {
                            tr
                            {
                                td colspan="7" data-empty-state="true" class="h-24 text-center"
                                {
                                    "No transactions match the current filters."
                                }
                            }
                        }

                        @for row in &model.rows {
                            (transaction_row(row))
                        }
                    }
                }
            }

            div class="flex justify-between items-center py-2"
            {
                button
                    type="submit"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete Selected"
                }
            }
        }
    }
}

fn transaction_row(row: &TransactionRow) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                input
                    type="checkbox"
                    name="selected"
                    value=(row.id)
                    checked[row.selected];
            }

            td class=(TABLE_CELL_STYLE) { (row.date) }

            td class=(TABLE_CELL_STYLE)
            {
                @if row.description.is_empty() {
                    span class="text-gray-400" { "—" }
                } @else {
                    (truncate_description(&row.description))
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (row.category_label) }
            }

            td class=(TABLE_CELL_STYLE) { (row.account_name) }

            td class={ "px-6 py-4 text-right font-medium " (amount_class(row.kind)) }
            {
                (row.amount)
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-2"
                {
                    a href=(row.edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        class=(LINK_STYLE)
                        hx-post=(row.clone_url)
                    {
                        "Clone"
                    }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(row.delete_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-confirm="Delete this transaction?"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn pagination_nav(indicators: &[IndicatorLink]) -> Markup {
    let link_class = "flex items-center justify-center px-3 h-8 leading-tight \
        text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 \
        hover:text-gray-700 dark:bg-gray-800 dark:border-gray-700 \
        dark:text-gray-400 dark:hover:bg-gray-700 dark:hover:text-white";
    let current_class = "flex items-center justify-center px-3 h-8 \
        text-blue-600 border border-gray-300 bg-blue-50 hover:bg-blue-100 \
        hover:text-blue-700 dark:bg-gray-700 dark:border-gray-700 dark:text-white";

    html! {
        nav class="pagination flex justify-center" aria-label="Ledger pages"
        {
            ul class="pagination inline-flex -space-x-px text-sm"
            {
                @for IndicatorLink { indicator, href } in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class=(current_class) { (page) }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(href) class=(link_class) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(link_class) { "…" }
                            }
                            PaginationIndicator::BackButton(_) => {
                                a href=(href) class=(link_class) { "Previous" }
                            }
                            PaginationIndicator::NextButton(_) => {
                                a href=(href) class=(link_class) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
