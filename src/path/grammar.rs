use winnow::combinator::separated;
use winnow::prelude::*;
use winnow::token::take_while;

use super::MAX_NAME_LEN;

// -- Names ------------------------------------------------------------------

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

pub(super) fn queue_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1..=MAX_NAME_LEN, is_name_char).parse_next(input)
}

// -- Paths ------------------------------------------------------------------

pub(super) fn queue_path<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    separated(1.., queue_name, '.').parse_next(input)
}
