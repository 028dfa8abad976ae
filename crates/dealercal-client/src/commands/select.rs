//! `dealercal select <type> <id>`: deliver the notice for one event.

use dealercal_core::{EventKey, SelectionNotice, SelectionNotifier, dispatch_selection};
use dealercal_providers::DealershipApi;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::notify::{DesktopNotifier, WriterNotifier};

use super::events::load_batch;

/// Looks `key` up in a fresh batch and dispatches it to `notifier`.
///
/// The lookup uses the full key, so an appointment and a service sharing an
/// id are never confused.
pub async fn select<N>(
    api: &dyn DealershipApi,
    config: &ClientConfig,
    key: EventKey,
    notifier: &mut N,
) -> ClientResult<SelectionNotice>
where
    N: SelectionNotifier + ?Sized,
{
    let batch = load_batch(api, config).await;
    let styled = batch.find(key).ok_or_else(|| {
        ClientError::NotFound(format!("no visible event {} in the calendar", key))
    })?;

    let notice = SelectionNotice::from_event(&styled.event);
    dispatch_selection(&styled.event, notifier);
    Ok(notice)
}

/// Runs the command with the stdout or desktop notifier.
pub async fn run(
    api: &dyn DealershipApi,
    config: &ClientConfig,
    key: EventKey,
    desktop: bool,
) -> ClientResult<()> {
    if desktop {
        let mut notifier = DesktopNotifier::new();
        select(api, config, key, &mut notifier).await?;
        notifier.finish()
    } else {
        let json = config.display.format == dealercal_core::OutputFormat::Json;
        let mut notifier = WriterNotifier::new(std::io::stdout().lock(), json);
        select(api, config, key, &mut notifier).await?;
        notifier.finish().map(drop)
    }
}
