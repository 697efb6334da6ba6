//! Newline-delimited JSON framing for server-streaming calls.

use std::convert::Infallible;

use bytes::Bytes;
use futures_util::stream;
use salvo::{
    http::header::{CONTENT_TYPE, HeaderValue},
    prelude::Response,
};
use serde::Serialize;
use tracing::error;

use super::{CallKind, RpcStatus, status::ErrorBody};

const INTERNAL_ERROR_FRAME: &[u8] =
    b"{\"error\":{\"code\":\"internal\",\"message\":\"Internal error\"}}\n";

#[derive(Serialize)]
struct ResultFrame<'a, T> {
    result: &'a T,
}

fn encode_line<T: Serialize>(value: &T) -> Result<Bytes, serde_json::Error> {
    let mut line = serde_json::to_vec(value)?;

    line.push(b'\n');

    Ok(Bytes::from(line))
}

/// Encode each item as a `{"result": ...}` line.
///
/// Encoding stops at the first failure, which is reported as a final
/// `{"error": ...}` line with a generic message.
pub(crate) fn ndjson_frames<T: Serialize>(items: impl IntoIterator<Item = T>) -> Vec<Bytes> {
    let mut frames = Vec::new();

    for item in items {
        match encode_line(&ResultFrame { result: &item }) {
            Ok(frame) => frames.push(frame),
            Err(source) => {
                error!("failed to encode stream frame: {source}");

                let status = RpcStatus::internal();

                frames.push(
                    encode_line(&ErrorBody { error: &status })
                        .unwrap_or_else(|_ignored| Bytes::from_static(INTERNAL_ERROR_FRAME)),
                );

                break;
            }
        }
    }

    frames
}

/// Stream pre-encoded frames as the response body.
pub(crate) fn render_stream(res: &mut Response, frames: Vec<Bytes>) {
    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static(CallKind::ServerStreaming.content_type()),
    );
    res.stream(stream::iter(frames.into_iter().map(Ok::<_, Infallible>)));
}

#[cfg(test)]
mod tests {
    use serde::ser::{Error as _, Serializer};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use super::*;

    enum Item {
        Good(u32),
        Broken,
    }

    impl Serialize for Item {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Good(value) => serializer.serialize_u32(*value),
                Self::Broken => Err(S::Error::custom("broken item")),
            }
        }
    }

    fn lines(frames: &[Bytes]) -> TestResult<Vec<Value>> {
        frames
            .iter()
            .map(|frame| Ok(serde_json::from_slice(frame)?))
            .collect()
    }

    #[test]
    fn each_item_becomes_one_result_line() -> TestResult {
        let frames = ndjson_frames([Item::Good(1), Item::Good(2)]);

        assert!(frames.iter().all(|frame| frame.ends_with(b"\n")), "frames are newline terminated");
        assert_eq!(lines(&frames)?, vec![json!({"result": 1}), json!({"result": 2})]);

        Ok(())
    }

    #[test]
    fn failure_mid_stream_ends_with_generic_error_line() -> TestResult {
        let frames = ndjson_frames([Item::Good(1), Item::Broken, Item::Good(3)]);

        assert_eq!(
            lines(&frames)?,
            vec![
                json!({"result": 1}),
                json!({"error": {"code": "internal", "message": "Internal error"}}),
            ]
        );

        Ok(())
    }

    #[test]
    fn fallback_error_frame_matches_encoded_internal_status() -> TestResult {
        let encoded = encode_line(&ErrorBody {
            error: &RpcStatus::internal(),
        })?;

        assert_eq!(encoded.as_ref(), INTERNAL_ERROR_FRAME);

        Ok(())
    }

    #[test]
    fn empty_input_yields_no_frames() {
        assert!(ndjson_frames(Vec::<u32>::new()).is_empty());
    }
}
