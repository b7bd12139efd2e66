use std::io;

use anyhow::Result;
use inquire::{InquireError, Select, Text};

use crate::{geocode::Geocoder, session::Session, State};

pub struct Input {
    pub street: String,
    pub city: String,
    pub state: State,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            street: "175 Forest St".to_string(),
            city: "Waltham".to_string(),
            state: State::default(),
        }
    }
}

/// Asks for an address until the user cancels. The previous answer becomes the
/// next default so a typo only needs one field fixed.
pub fn run<G: Geocoder>(session: &Session<G>) -> Result<()> {
    println!(
        "Enter your address to find the {} closest {} stores in your state!",
        session.limit, session.brand
    );
    println!("(Esc or Ctrl-C to quit)\n");

    let mut last = Input::default();
    loop {
        let input = match ask(&last) {
            Ok(x) => x,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(())
            }
            Err(err) => return Err(err.into()),
        };

        let query = session.query(&input.street, &input.city, input.state);
        if let Err(err) = session.answer(query, &mut io::stdout()) {
            // network trouble shouldn't end the whole session
            log::error!("{err:#}");
        }
        println!();
        last = input;
    }
}

fn ask(last: &Input) -> Result<Input, InquireError> {
    let street = Text::new("Address").with_default(&last.street).prompt()?;
    let city = Text::new("City").with_default(&last.city).prompt()?;
    let state = Select::new("State", State::all())
        .with_starting_cursor(last.state.index())
        .prompt()?;

    Ok(Input {
        street,
        city,
        state,
    })
}
