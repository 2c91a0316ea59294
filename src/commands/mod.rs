use std::{collections::HashSet, sync::Arc};

use crate::{
    meeting::{MeetingPoint, Participant, Planner, MIN_PARTICIPANTS},
    services::{GoogleMapsService, TransportMode, TravelTime, UnknownTransportMode},
    GenericError,
};

use log::*;
use thiserror::Error;
use serenity::{
    framework::standard::{
        help_commands::with_embeds,
        macros::{command, group, help},
        Args, CommandGroup, CommandResult, HelpOptions,
    },
    model::{channel::Message, id::UserId},
    prelude::*,
};

/// Discord refuses messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("At least {min} participants are needed, got {got}.")]
    NotEnoughParticipants { min: usize, got: usize },
    #[error(transparent)]
    UnknownTransportMode(#[from] UnknownTransportMode),
    #[error("Missing address after transport mode `{0}`.")]
    MissingAddress(String),
}

pub struct PlannerContainer;

impl TypeMapKey for PlannerContainer {
    type Value = Arc<Planner<GoogleMapsService>>;
}

#[help]
pub async fn help(
    context: &Context,
    msg: &Message,
    args: Args,
    help_options: &'static HelpOptions,
    groups: &[&'static CommandGroup],
    owners: HashSet<UserId>,
) -> CommandResult {
    let _ = with_embeds(context, msg, args, help_options, groups, owners).await?;
    Ok(())
}

#[group]
#[commands(meet)]
pub struct General;

#[command]
#[description("Find a fair place to meet. Give a transport mode and a quoted address for each person.")]
#[usage("[mode] \"[address]\" [mode] \"[address]\"...")]
#[example("driving \"221B Baker Street, London\" walking \"10 Downing Street, London\"")]
async fn meet(ctx: &Context, msg: &Message, mut args: Args) -> CommandResult {
    trace!("Received meet command.");
    let mut tokens = Vec::new();
    while !args.is_empty() {
        tokens.push(args.single_quoted::<String>()?);
    }

    let replies = match parse_participants(&tokens) {
        Ok(participants) => {
            let planner = {
                let data = ctx.data.read().await;
                data.get::<PlannerContainer>()
                    .cloned()
                    .ok_or("Meeting planner not initialised.")?
            };
            match planner.plan(&participants).await {
                Ok(point) => format_reply(&participants, &point)?,
                Err(why) => vec![format!("Couldn't find a meeting point: {}", why)],
            }
        }
        Err(why) => vec![why.to_string()],
    };

    for reply in replies {
        if let Err(why) = msg.channel_id.say(&ctx.http, reply).await {
            warn!("Error sending message: {:?}", why);
        }
    }

    Ok(())
}

/// Reads alternating `mode address` tokens.
pub fn parse_participants<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Participant>, InputError> {
    let mut participants = Vec::new();
    for pair in tokens.chunks(2) {
        let mode_token = pair[0].as_ref();
        let mode: TransportMode = mode_token.parse()?;
        let address = pair
            .get(1)
            .map(|address| address.as_ref().trim())
            .filter(|address| !address.is_empty())
            .ok_or_else(|| InputError::MissingAddress(mode_token.to_string()))?;
        participants.push(Participant::new(address, mode));
    }
    if participants.len() < MIN_PARTICIPANTS {
        return Err(InputError::NotEnoughParticipants {
            min: MIN_PARTICIPANTS,
            got: participants.len(),
        });
    }
    Ok(participants)
}

fn format_travel_time(time: TravelTime) -> String {
    match time {
        TravelTime::Seconds(secs) => format!("{:.0} min", (secs / 60.0).round()),
        TravelTime::Unreachable => "unreachable".to_string(),
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Packs `text` into messages of at most `limit` characters, breaking
/// between lines where possible.
fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();
    for line in text.split_inclusive('\n') {
        if char_len(&current) + char_len(line) > limit && !current.is_empty() {
            messages.push(std::mem::take(&mut current));
        }
        if char_len(line) > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                messages.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

/// The summary followed by the result as JSON, as one or more messages that
/// each fit in [`MESSAGE_LIMIT`]. The JSON block is never split: it falls
/// back to compact form, then is left out if even that is too long.
pub fn format_reply(
    participants: &[Participant],
    point: &MeetingPoint,
) -> Result<Vec<String>, GenericError> {
    let mut summary = format!(
        "Meet at **{}**, {} ({}).\n",
        point.name, point.address, point.coordinate
    );
    for (participant, time) in participants.iter().zip(&point.travel_times) {
        summary.push_str(&format!(
            "- {} ({}): {}\n",
            participant.address,
            participant.mode,
            format_travel_time(*time)
        ));
    }
    summary.push_str(&format!(
        "Average trip: {}\n",
        format_travel_time(point.mean_travel_time)
    ));
    if !point.unlocated_addresses.is_empty() {
        summary.push_str(&format!(
            "Couldn't locate: {}\n",
            point.unlocated_addresses.join("; ")
        ));
    }
    let mut messages = split_message(&summary, MESSAGE_LIMIT);

    let pretty = format!("```json\n{}\n```", serde_json::to_string_pretty(point)?);
    let compact = format!("```json\n{}\n```", serde_json::to_string(point)?);
    let block = [pretty, compact]
        .into_iter()
        .find(|block| char_len(block) <= MESSAGE_LIMIT);
    let Some(block) = block else {
        debug!("Result JSON does not fit in a message, leaving it out.");
        return Ok(messages);
    };
    let fits = messages
        .last()
        .map_or(false, |last| char_len(last) + char_len(&block) <= MESSAGE_LIMIT);
    match messages.last_mut() {
        Some(last) if fits => last.push_str(&block),
        _ => messages.push(block),
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Coordinate, Venue};

    #[test]
    fn parses_mode_address_pairs_in_order() {
        let participants = parse_participants(&[
            "driving",
            "221B Baker Street, London",
            "Walk",
            "10 Downing Street, London",
        ])
        .unwrap();
        assert_eq!(
            participants,
            vec![
                Participant::new("221B Baker Street, London", TransportMode::Driving),
                Participant::new("10 Downing Street, London", TransportMode::Walking),
            ]
        );
    }

    #[test]
    fn rejects_a_single_participant() {
        assert_eq!(
            parse_participants(&["transit", "Somewhere"]),
            Err(InputError::NotEnoughParticipants { min: 2, got: 1 })
        );
    }

    #[test]
    fn rejects_dangling_mode() {
        assert_eq!(
            parse_participants(&["driving", "A", "walking"]),
            Err(InputError::MissingAddress("walking".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_mode() {
        assert_eq!(
            parse_participants(&["skating", "A", "walking", "B"]),
            Err(InputError::UnknownTransportMode(UnknownTransportMode(
                "skating".to_string()
            )))
        );
    }

    #[test]
    fn reply_lists_everyone_and_embeds_json() {
        let participants = vec![
            Participant::new("A", TransportMode::Driving),
            Participant::new("B", TransportMode::Transit),
        ];
        let point = MeetingPoint::new(
            Venue::placeholder(Coordinate::new(1.0, 2.0)),
            vec![TravelTime::Seconds(600.0), TravelTime::Unreachable],
        )
        .with_unlocated(vec!["B".to_string()]);

        let replies = format_reply(&participants, &point).unwrap();

        assert_eq!(replies.len(), 1);
        let reply = &replies[0];
        assert!(reply.starts_with("Meet at **Meeting Point**, No venue found (1,2)."));
        assert!(reply.contains("- A (driving): 10 min\n"));
        assert!(reply.contains("- B (transit): unreachable\n"));
        assert!(reply.contains("Average trip: 10 min\n"));
        assert!(reply.contains("Couldn't locate: B\n"));
        assert!(reply.contains("\"travel_times\": [\n    600.0,\n    null\n  ]"));
    }

    #[test]
    fn large_groups_are_split_into_messages_discord_accepts() {
        let participants: Vec<Participant> = (0..30)
            .map(|i| {
                Participant::new(
                    format!("{} Some Fairly Ordinary Street, Greater London, UK", i),
                    TransportMode::Transit,
                )
            })
            .collect();
        let point = MeetingPoint::new(
            Venue::placeholder(Coordinate::new(51.5074, -0.1278)),
            vec![TravelTime::Seconds(1234.0); 30],
        );

        let replies = format_reply(&participants, &point).unwrap();

        assert!(replies.len() > 1);
        for reply in &replies {
            assert!(reply.chars().count() <= MESSAGE_LIMIT, "{} chars", reply.chars().count());
        }
        let all = replies.concat();
        for participant in &participants {
            assert!(all.contains(&format!("- {} (transit): 21 min\n", participant.address)));
        }
        let json_blocks = replies.iter().filter(|r| r.contains("```json")).count();
        assert_eq!(json_blocks, 1);
        assert!(all.ends_with("```"));
    }

    #[test]
    fn overlong_lines_are_cut_at_the_limit() {
        let line = "x".repeat(45);
        let messages = split_message(&format!("short\n{}\nend\n", line), 20);
        assert_eq!(
            messages,
            vec![
                "short\n".to_string(),
                "x".repeat(20),
                "x".repeat(20),
                "xxxxx\n".to_string(),
                "end\n".to_string(),
            ]
        );
    }
}
