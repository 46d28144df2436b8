//! Defines the page with the form for creating a new account.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    currency::CURRENCIES,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base,
    },
    navigation::NavBar,
};

use super::core::Account;

/// Render the page with the form for creating a new account.
pub async fn get_new_account_page() -> Response {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let content = html! {
        (nav_bar)

        main class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold py-4" { "Create Account" }

            (account_form(endpoints::ACCOUNTS_API, false, "Create", None))

            p class="py-2"
            {
                a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "Back to Accounts" }
            }
        }
    };

    base("Create Account", &content).into_response()
}

/// The shared form markup for creating and editing accounts.
pub(super) fn account_form(
    action: &str,
    use_put: bool,
    submit_label: &str,
    prefill: Option<&Account>,
) -> Markup {
    html! {
        form
            hx-post=[(!use_put).then_some(action)]
            hx-put=[use_put.then_some(action)]
            class="space-y-4 w-full"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    type="text"
                    name="name"
                    id="name"
                    required
                    placeholder="e.g. Checking Account"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[prefill.map(|account| account.name.as_str())];
            }

            div
            {
                label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }
                select name="currency" id="currency" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for currency in CURRENCIES {
                        option
                            value=(currency.code())
                            selected[prefill.map(|account| account.currency) == Some(currency)]
                        {
                            (currency.code())
                        }
                    }
                }
            }

            div
            {
                label for="balance" class=(FORM_LABEL_STYLE) { "Balance (optional)" }
                input
                    type="number"
                    name="balance"
                    id="balance"
                    step="0.01"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[prefill.and_then(|account| account.balance)];
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
