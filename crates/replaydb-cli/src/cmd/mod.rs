pub mod get;
pub mod insert;
pub mod inspect;
pub mod list;
pub mod remove;
pub mod search;

mod common;

use replaydb_core::ReplayRecord;

fn print_record(r: &ReplayRecord) {
    println!(
        "{}\tdate={}\tranked={}\tmode={}\tsource={}\tresult={}\tflipped={}\tmatch0={}\tmatch1={}\ttitle={}\tauthor={}",
        r.id, r.date, r.ranked, r.mode, r.source, r.result, r.flipped, r.match0, r.match1, r.title, r.author_name
    );
}
