//! Demo data served by the in-memory reservation store.

use crate::model::{Checkout, CheckoutId, Owner};

#[allow(clippy::too_many_arguments)]
fn owner(
    id: i64,
    first: &str,
    last: &str,
    email: &str,
    department: &str,
    client: bool,
    primary: bool,
    alert: bool,
    checkout_id: CheckoutId,
) -> Owner {
    Owner {
        id,
        first_name: first.into(),
        last_name: last.into(),
        email: email.into(),
        department: department.into(),
        client,
        primary,
        alert,
        checkout_id,
    }
}

#[allow(clippy::too_many_arguments)]
fn checkout(
    id: CheckoutId,
    client_code: &str,
    start: &str,
    end: &str,
    jira: &str,
    hd_event: &str,
    notes: &str,
    permanent: bool,
    owners: Vec<Owner>,
) -> Checkout {
    Checkout {
        id,
        server: "UX04".into(),
        client_code: client_code.into(),
        start_date: Some(start.into()),
        end_date: Some(end.into()),
        jira: jira.into(),
        hd_event: hd_event.into(),
        notes: notes.into(),
        permanent,
        owners,
    }
}

const NOTE: &str = "My First Note goes something like this";

/// Six checkouts of `UX04` with two owners each.
pub fn demo_checkouts() -> Vec<Checkout> {
    vec![
        checkout(
            1,
            "FM",
            "05/01/2018",
            "05/31/2018",
            "HEK-100",
            "869632",
            "My First Note goes something like this. It runs long on purpose so the \
             notes column has to wrap when the table is rendered.",
            false,
            vec![
                owner(1, "Stellar", "Lumens", "SLumens@XLM.com", "XLM", true, false, false, 1),
                owner(2, "Ripple", "Zerps", "Ripple@XRP.com", "XRP", false, true, true, 1),
            ],
        ),
        checkout(
            2,
            "CK",
            "01/01/2018",
            "12/31/2018",
            "HEK-518",
            "861456",
            NOTE,
            false,
            vec![
                owner(3, "Bitcoin", "Sucks", "Bitcoin@BTC.com", "BTC", false, true, false, 2),
                owner(4, "Nebulas", "Hitter", "Nebulas@NAS.com", "NAS", false, false, true, 2),
            ],
        ),
        checkout(
            3,
            "WR",
            "10/01/2018",
            "11/30/2018",
            "HEK-83",
            "864545",
            NOTE,
            true,
            vec![
                owner(5, "Tron", "Justin", "Tron@TRX.com", "TRX", false, true, true, 3),
                owner(6, "Mo", "Poe", "Poet@POE.com", "POE", true, false, false, 3),
            ],
        ),
        checkout(
            4,
            "SX",
            "05/01/2018",
            "05/31/2018",
            "HEK-673",
            "864554",
            NOTE,
            false,
            vec![
                owner(7, "Monero", "IOTA", "Monero@XMR.com", "XMR", false, true, true, 4),
                owner(8, "NEO", "Litecoin", "NEO@NEO.com", "NEO", false, false, false, 4),
            ],
        ),
        checkout(
            5,
            "GN",
            "01/01/2018",
            "12/31/2018",
            "HEK-671",
            "860217",
            NOTE,
            false,
            vec![
                owner(9, "Vechain", "Qtum", "Vechain@VEN.com", "VEN", true, true, true, 5),
                owner(10, "Ethereum", "Moon", "Ethereum@ETH.com", "ETH", false, false, false, 5),
            ],
        ),
        checkout(
            6,
            "GX",
            "10/01/2018",
            "11/30/2018",
            "HPEDI-877",
            "870200",
            NOTE,
            true,
            vec![
                owner(11, "Dragon", "Chain", "DragonChain@DRGN.com", "DRGN", false, true, true, 6),
                owner(12, "Medi", "Bloc", "MediBloc@MED.com", "MED", false, false, false, 6),
            ],
        ),
    ]
}
