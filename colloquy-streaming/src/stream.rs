//! Stream adapter over a raw byte source.
//!
//! Wraps any fallible byte stream (an HTTP response body, a test fixture)
//! and yields decoded [`StreamEvent`]s. The sequence is finite and
//! non-restartable: once the source ends or fails, the adapter is done.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;

use crate::error::{StreamError, StreamResult};
use crate::events::StreamEvent;
use crate::frame::FrameDecoder;

pin_project! {
    /// Decoded-event stream over a byte stream.
    pub struct EventStream<S> {
        #[pin]
        inner: S,
        decoder: FrameDecoder,
        pending: VecDeque<StreamEvent>,
        finished: bool,
    }
}

impl<S> EventStream<S> {
    /// Wrap a byte stream.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

impl<S, E> Stream for EventStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    type Item = StreamResult<StreamEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }
            if *this.finished {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => match this.decoder.feed(&chunk) {
                    Ok(events) => this.pending.extend(events),
                    Err(err) => {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(err)));
                    }
                },
                Poll::Ready(Some(Err(err))) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(StreamError::connection(err))));
                }
                Poll::Ready(None) => {
                    *this.finished = true;
                    this.pending.extend(this.decoder.finish());
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
