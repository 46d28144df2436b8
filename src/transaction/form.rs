//! The shared form markup for creating and editing transactions.

use maud::{Markup, html};
use time::Date;

use crate::{
    account::Account,
    currency::CURRENCIES,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

use super::core::{
    Category, EXPENSE_CATEGORIES, INCOME_CATEGORIES, Transaction, TransactionKind,
};

/// Configuration for the transaction form.
pub(crate) struct TransactionFormOptions<'a> {
    /// The endpoint the form submits to.
    pub(crate) action: &'a str,
    /// Submit with an HTMX PUT instead of a POST (for edits).
    pub(crate) use_put: bool,
    /// The label on the submit button.
    pub(crate) submit_label: &'a str,
    /// The transaction to prefill the form with, for edits.
    ///
    /// The transaction's kind is immutable, so the category select is
    /// restricted to the matching category set when this is set.
    pub(crate) prefill: Option<&'a Transaction>,
    /// The date to preselect when there is no prefill.
    pub(crate) default_date: Date,
    /// The accounts available in the account dropdown.
    pub(crate) accounts: &'a [Account],
}

pub(crate) fn transaction_form(options: TransactionFormOptions) -> Markup {
    let selected_category = options
        .prefill
        .map(|transaction| transaction.category.as_query_value());
    let selected_category = selected_category.as_deref();
    let kind = options.prefill.map(|transaction| transaction.kind());
    let date = options
        .prefill
        .map(|transaction| transaction.date)
        .unwrap_or(options.default_date);

    html! {
        form
            hx-post=[(!options.use_put).then_some(options.action)]
            hx-put=[options.use_put.then_some(options.action)]
            class="space-y-4 w-full"
        {
            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    type="number"
                    name="amount"
                    id="amount"
                    step="0.01"
                    min="0"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[options.prefill.map(|transaction| transaction.amount)];
            }

            div
            {
                label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }
                select name="currency" id="currency" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for currency in CURRENCIES {
                        option
                            value=(currency.code())
                            selected[options.prefill.map(|transaction| transaction.currency) == Some(currency)]
                        {
                            (currency.code())
                        }
                    }
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @if kind != Some(TransactionKind::Income) {
                        optgroup label="Expenses"
                        {
                            @for category in EXPENSE_CATEGORIES {
                                @let value = Category::Expense(category).as_query_value();
                                option
                                    value=(value)
                                    selected[selected_category == Some(value.as_str())]
                                {
                                    (category.label())
                                }
                            }
                        }
                    }

                    @if kind != Some(TransactionKind::Expense) {
                        optgroup label="Income"
                        {
                            @for category in INCOME_CATEGORIES {
                                @let value = Category::Income(category).as_query_value();
                                option
                                    value=(value)
                                    selected[selected_category == Some(value.as_str())]
                                {
                                    (category.label())
                                }
                            }
                        }
                    }
                }
            }

            div
            {
                label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }
                select name="account_id" id="account_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for account in options.accounts {
                        option
                            value=(account.id)
                            selected[options.prefill.map(|transaction| transaction.account_id) == Some(account.id)]
                        {
                            (account.name) " (" (account.currency.code()) ")"
                        }
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="date"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(date);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    type="text"
                    name="description"
                    id="description"
                    placeholder="What was this for?"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[options.prefill.map(|transaction| transaction.description.as_str())];
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (options.submit_label) }
        }
    }
}
