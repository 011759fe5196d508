// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method calls the corresponding
// Android API through JNI against the hosting Activity.
//
// ## Threading
//
// `Toast.show`, `enableForegroundDispatch` and `disableForegroundDispatch`
// must run on the main thread. The lifecycle coordinator only calls them from
// its foreground context, which the Activity glue runs on the UI thread.
// `Vibrator.vibrate` is safe from any thread.
//
// ## Tag delivery
//
// Foreground dispatch re-delivers discoveries to the Activity's `onNewIntent`
// (the registration intent carries `FLAG_ACTIVITY_SINGLE_TOP`). The Activity
// forwards the intent to `nativeOnNewIntent`, which decodes it and hands the
// event to the sink installed with `tag_sink::install_tag_sink`.

#![cfg(target_os = "android")]

use std::time::Duration;

use jni::objects::{JByteArray, JObject, JValue};
use jni::JNIEnv;

use tagshell_core::error::{Result, ShellError};
use tagshell_core::types::{DiscoveryCategory, MessageDuration, SessionToken, TagEvent};

use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

const ACTION_NDEF_DISCOVERED: &str = "android.nfc.action.NDEF_DISCOVERED";
const ACTION_TAG_DISCOVERED: &str = "android.nfc.action.TAG_DISCOVERED";
const EXTRA_TAG: &str = "android.nfc.extra.TAG";

const FLAG_ACTIVITY_SINGLE_TOP: i32 = 0x2000_0000;
const PENDING_INTENT_FLAG_MUTABLE: i32 = 0x0200_0000;

const TOAST_LENGTH_SHORT: i32 = 0;
const TOAST_LENGTH_LONG: i32 = 1;

/// Run `f` with a JNI environment attached to the current thread and the
/// hosting Activity.
///
/// The `JavaVM*` and Activity `jobject` come from `ndk_context`, set by the
/// NDK glue (`android_main` or `ANativeActivity_onCreate`).
fn with_activity<T>(f: impl FnOnce(&mut JNIEnv, &JObject) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` is the `JavaVM*` registered by the NDK glue and stays
    // valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| ShellError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| ShellError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(ShellError::Bridge(
            "Android context is null; activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this is a valid global reference to the
    // hosting Activity.
    let activity = unsafe { JObject::from_raw(ptr.cast()) };
    f(&mut env, &activity)
}

/// Map any `jni::errors::Error` into `ShellError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> ShellError {
    ShellError::Bridge(format!("{context}: {e}"))
}

/// `NfcAdapter.getDefaultAdapter(activity)`, or `None` when the device has no
/// NFC hardware.
fn nfc_adapter<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject,
) -> Result<Option<JObject<'local>>> {
    let adapter = env
        .call_static_method(
            "android/nfc/NfcAdapter",
            "getDefaultAdapter",
            "(Landroid/content/Context;)Landroid/nfc/NfcAdapter;",
            &[JValue::Object(activity)],
        )
        .map_err(|e| jni_err("NfcAdapter.getDefaultAdapter", e))?
        .l()
        .map_err(|e| jni_err("getDefaultAdapter->l", e))?;
    Ok((!adapter.is_null()).then_some(adapter))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the platform bridge.
///
/// Zero-sized; all state lives on the Java side.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI; the first JNI call happens lazily when a
    /// trait method is invoked.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// TagReader: android.nfc.NfcAdapter foreground dispatch
// ---------------------------------------------------------------------------

impl TagReader for AndroidBridge {
    fn is_available(&self) -> bool {
        match with_activity(|env, activity| Ok(nfc_adapter(env, activity)?.is_some())) {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!(error = %e, "Android: NFC adapter lookup failed");
                false
            }
        }
    }

    /// Enable foreground dispatch for NDEF and raw tag discoveries.
    ///
    /// The pending intent targets this Activity with `FLAG_ACTIVITY_SINGLE_TOP`
    /// so a discovery re-enters the running Activity through `onNewIntent`.
    fn register(&self, session: &SessionToken, categories: &[DiscoveryCategory]) -> Result<()> {
        with_activity(|env, activity| {
            let Some(adapter) = nfc_adapter(env, activity)? else {
                return Err(ShellError::UnsupportedCapability);
            };

            // new Intent(activity, activity.getClass()).addFlags(SINGLE_TOP)
            let class = env
                .get_object_class(activity)
                .map_err(|e| jni_err("getClass", e))?;
            let intent = env
                .new_object(
                    "android/content/Intent",
                    "(Landroid/content/Context;Ljava/lang/Class;)V",
                    &[JValue::Object(activity), JValue::Object(&class)],
                )
                .map_err(|e| jni_err("new Intent", e))?;
            env.call_method(
                &intent,
                "addFlags",
                "(I)Landroid/content/Intent;",
                &[JValue::Int(FLAG_ACTIVITY_SINGLE_TOP)],
            )
            .map_err(|e| jni_err("addFlags", e))?;

            let request_code = (session.0.as_u128() & 0x7fff_ffff) as i32;
            let pending = env
                .call_static_method(
                    "android/app/PendingIntent",
                    "getActivity",
                    "(Landroid/content/Context;ILandroid/content/Intent;I)Landroid/app/PendingIntent;",
                    &[
                        JValue::Object(activity),
                        JValue::Int(request_code),
                        JValue::Object(&intent),
                        JValue::Int(PENDING_INTENT_FLAG_MUTABLE),
                    ],
                )
                .map_err(|e| jni_err("PendingIntent.getActivity", e))?
                .l()
                .map_err(|e| jni_err("getActivity->l", e))?;

            let filters = env
                .new_object_array(
                    categories.len() as i32,
                    "android/content/IntentFilter",
                    JObject::null(),
                )
                .map_err(|e| jni_err("new IntentFilter[]", e))?;
            for (index, category) in categories.iter().enumerate() {
                let action = match category {
                    DiscoveryCategory::StructuredPayload => ACTION_NDEF_DISCOVERED,
                    DiscoveryCategory::RawTag => ACTION_TAG_DISCOVERED,
                };
                let j_action = env
                    .new_string(action)
                    .map_err(|e| jni_err("new_string(action)", e))?;
                let filter = env
                    .new_object(
                        "android/content/IntentFilter",
                        "(Ljava/lang/String;)V",
                        &[JValue::Object(&j_action)],
                    )
                    .map_err(|e| jni_err("new IntentFilter", e))?;
                env.set_object_array_element(&filters, index as i32, filter)
                    .map_err(|e| jni_err("IntentFilter[] set", e))?;
            }

            env.call_method(
                &adapter,
                "enableForegroundDispatch",
                "(Landroid/app/Activity;Landroid/app/PendingIntent;[Landroid/content/IntentFilter;[[Ljava/lang/String;)V",
                &[
                    JValue::Object(activity),
                    JValue::Object(&pending),
                    JValue::Object(&filters),
                    JValue::Object(&JObject::null()),
                ],
            )
            .map_err(|e| jni_err("enableForegroundDispatch", e))?;

            tracing::info!(%session, ?categories, "Android: NFC foreground dispatch enabled");
            Ok(())
        })
    }

    fn unregister(&self) -> Result<()> {
        with_activity(|env, activity| {
            let Some(adapter) = nfc_adapter(env, activity)? else {
                return Ok(());
            };
            env.call_method(
                &adapter,
                "disableForegroundDispatch",
                "(Landroid/app/Activity;)V",
                &[JValue::Object(activity)],
            )
            .map_err(|e| jni_err("disableForegroundDispatch", e))?;
            tracing::info!("Android: NFC foreground dispatch disabled");
            Ok(())
        })
    }
}

/// `MainActivity.nativeOnNewIntent(Intent)`, called from `onNewIntent`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_invictusbjj_app_MainActivity_nativeOnNewIntent(
    mut env: JNIEnv,
    _activity: JObject,
    intent: JObject,
) {
    match tag_event_from_intent(&mut env, &intent) {
        Ok(Some(event)) => {
            crate::tag_sink::deliver_tag(event);
        }
        Ok(None) => tracing::debug!("Android: intent is not a tag discovery"),
        Err(e) => tracing::warn!(error = %e, "Android: could not read tag intent"),
    }
}

/// Extract a tag discovery from an intent delivered to `onNewIntent`.
///
/// Returns `Ok(None)` for intents that are not tag discoveries or carry no
/// tag extra.
fn tag_event_from_intent(env: &mut JNIEnv, intent: &JObject) -> Result<Option<TagEvent>> {
    let action = env
        .call_method(intent, "getAction", "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err("getAction", e))?
        .l()
        .map_err(|e| jni_err("getAction->l", e))?;
    if action.is_null() {
        return Ok(None);
    }
    let action: String = env
        .get_string(&action.into())
        .map_err(|e| jni_err("get_string(action)", e))?
        .into();
    let category = match action.as_str() {
        ACTION_NDEF_DISCOVERED => DiscoveryCategory::StructuredPayload,
        ACTION_TAG_DISCOVERED => DiscoveryCategory::RawTag,
        _ => return Ok(None),
    };

    let j_extra = env
        .new_string(EXTRA_TAG)
        .map_err(|e| jni_err("new_string(EXTRA_TAG)", e))?;
    let tag = env
        .call_method(
            intent,
            "getParcelableExtra",
            "(Ljava/lang/String;)Landroid/os/Parcelable;",
            &[JValue::Object(&j_extra)],
        )
        .map_err(|e| jni_err("getParcelableExtra", e))?
        .l()
        .map_err(|e| jni_err("getParcelableExtra->l", e))?;
    if tag.is_null() {
        return Ok(None);
    }

    let id: JByteArray = env
        .call_method(&tag, "getId", "()[B", &[])
        .map_err(|e| jni_err("Tag.getId", e))?
        .l()
        .map_err(|e| jni_err("getId->l", e))?
        .into();
    let bytes = env
        .convert_byte_array(&id)
        .map_err(|e| jni_err("convert_byte_array", e))?;

    Ok(Some(TagEvent::with_category(bytes, category)))
}

// ---------------------------------------------------------------------------
// Notifier: android.widget.Toast
// ---------------------------------------------------------------------------

impl Notifier for AndroidBridge {
    fn show_message(&self, text: &str, duration: MessageDuration) -> Result<()> {
        let length = match duration {
            MessageDuration::Short => TOAST_LENGTH_SHORT,
            MessageDuration::Long => TOAST_LENGTH_LONG,
        };
        with_activity(|env, activity| {
            let j_text = env
                .new_string(text)
                .map_err(|e| jni_err("new_string(text)", e))?;
            let toast = env
                .call_static_method(
                    "android/widget/Toast",
                    "makeText",
                    "(Landroid/content/Context;Ljava/lang/CharSequence;I)Landroid/widget/Toast;",
                    &[
                        JValue::Object(activity),
                        JValue::Object(&j_text),
                        JValue::Int(length),
                    ],
                )
                .map_err(|e| jni_err("Toast.makeText", e))?
                .l()
                .map_err(|e| jni_err("makeText->l", e))?;
            env.call_method(&toast, "show", "()V", &[])
                .map_err(|e| jni_err("Toast.show", e))?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Haptics: android.os.Vibrator
// ---------------------------------------------------------------------------

/// `activity.getSystemService("vibrator")`, or `None` if the service is absent.
fn vibrator<'local>(env: &mut JNIEnv<'local>, activity: &JObject) -> Result<Option<JObject<'local>>> {
    let name = env
        .new_string("vibrator")
        .map_err(|e| jni_err("new_string(vibrator)", e))?;
    let service = env
        .call_method(
            activity,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&name)],
        )
        .map_err(|e| jni_err("getSystemService(vibrator)", e))?
        .l()
        .map_err(|e| jni_err("getSystemService->l", e))?;
    Ok((!service.is_null()).then_some(service))
}

impl Haptics for AndroidBridge {
    fn has_vibrator(&self) -> bool {
        let result = with_activity(|env, activity| {
            let Some(vib) = vibrator(env, activity)? else {
                return Ok(false);
            };
            env.call_method(&vib, "hasVibrator", "()Z", &[])
                .map_err(|e| jni_err("hasVibrator", e))?
                .z()
                .map_err(|e| jni_err("hasVibrator->z", e))
        });
        result.unwrap_or(false)
    }

    fn vibrate(&self, duration: Duration) -> Result<()> {
        with_activity(|env, activity| {
            let Some(vib) = vibrator(env, activity)? else {
                return Ok(());
            };
            let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
            env.call_method(&vib, "vibrate", "(J)V", &[JValue::Long(millis)])
                .map_err(|e| jni_err("Vibrator.vibrate", e))?;
            Ok(())
        })
    }
}
