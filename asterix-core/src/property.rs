//! Property catalogue: every semantic tag a decoded record can carry.
//!
//! Each tag has a fixed numeric code (stable across releases, used by the
//! CLI and config files) and a canonical storage kind. Values are stored
//! in their wire form; scaling to physical units is done by the item
//! tables (see `item::Unit`) and the conversion layer.

use serde::{Deserialize, Serialize};

/// Canonical storage kind of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    Text,
    Data,
}

impl PropertyKind {
    pub fn is_integer(self) -> bool {
        !matches!(self, PropertyKind::Text | PropertyKind::Data)
    }

    pub fn is_signed(self) -> bool {
        matches!(self, PropertyKind::I8 | PropertyKind::I16 | PropertyKind::I32)
    }

    /// Bytes needed to hold the kind; 0 for text and blobs.
    pub fn width(self) -> usize {
        match self {
            PropertyKind::U8 | PropertyKind::I8 => 1,
            PropertyKind::U16 | PropertyKind::I16 => 2,
            PropertyKind::U32 | PropertyKind::I32 => 4,
            PropertyKind::Text | PropertyKind::Data => 0,
        }
    }
}

/// A stored property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    Text(String),
    Data(Vec<u8>),
}

impl Value {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Value::U8(_) => PropertyKind::U8,
            Value::I8(_) => PropertyKind::I8,
            Value::U16(_) => PropertyKind::U16,
            Value::I16(_) => PropertyKind::I16,
            Value::U32(_) => PropertyKind::U32,
            Value::I32(_) => PropertyKind::I32,
            Value::Text(_) => PropertyKind::Text,
            Value::Data(_) => PropertyKind::Data,
        }
    }

    /// Integer value widened to i64, `None` for text and blobs.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::U8(v) => Some(v as i64),
            Value::I8(v) => Some(v as i64),
            Value::U16(v) => Some(v as i64),
            Value::I16(v) => Some(v as i64),
            Value::U32(v) => Some(v as i64),
            Value::I32(v) => Some(v as i64),
            Value::Text(_) | Value::Data(_) => None,
        }
    }

    /// Build an integer value of `kind` from a raw wire value.
    ///
    /// Signed kinds take `raw` as already sign-extended. Returns `None`
    /// when the value does not fit the kind.
    pub fn from_raw(kind: PropertyKind, raw: i64) -> Option<Value> {
        Some(match kind {
            PropertyKind::U8 => Value::U8(u8::try_from(raw).ok()?),
            PropertyKind::I8 => Value::I8(i8::try_from(raw).ok()?),
            PropertyKind::U16 => Value::U16(u16::try_from(raw).ok()?),
            PropertyKind::I16 => Value::I16(i16::try_from(raw).ok()?),
            PropertyKind::U32 => Value::U32(u32::try_from(raw).ok()?),
            PropertyKind::I32 => Value::I32(i32::try_from(raw).ok()?),
            PropertyKind::Text | PropertyKind::Data => return None,
        })
    }
}

macro_rules! properties {
    ($( $name:ident = $code:literal : $kind:ident, )*) => {
        /// Semantic tag of a decoded value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum Property {
            $( $name = $code, )*
        }

        impl Property {
            /// Every tag in the catalogue, in code order.
            pub const ALL: &'static [Property] = &[ $( Property::$name, )* ];

            pub fn kind(self) -> PropertyKind {
                match self {
                    $( Property::$name => PropertyKind::$kind, )*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( Property::$name => stringify!($name), )*
                }
            }

            pub fn from_code(code: u16) -> Option<Property> {
                match code {
                    $( $code => Some(Property::$name), )*
                    _ => None,
                }
            }
        }
    };
}

properties! {
    // General
    MessageType = 1: U8,
    Sac = 2: U8,
    Sic = 3: U8,
    TimeOfDay = 4: U32,
    TimeOfDayTruncated = 5: U16,
    ServiceId = 6: U8,
    WarningError = 7: Data,
    Spf = 8: Data,
    Versions = 9: Data,

    // Sensor status (CAT002, CAT034, CAT019)
    SectorNumber = 10: U8,
    AntennaRotationPeriod = 11: U16,
    StatusCommon = 12: U8,
    StatusPsr = 13: U8,
    StatusSsr = 14: U8,
    StatusModeS = 15: U16,
    ProcModeCommon = 16: U8,
    ProcModePsr = 17: U8,
    ProcModeSsr = 18: U8,
    ProcModeModeS = 19: U8,
    StationStatus = 20: Data,
    StationMode = 21: Data,
    SystemStatus = 22: U8,
    ProcessorStatus = 23: U8,
    SensorStatus = 24: Data,
    RefTransponderStatus = 25: Data,
    Wgs84Undulation = 26: I8,

    // Plot counters (CAT002/CAT034 I0xx/070)
    CountSsrPsrHits = 30: U16,
    CountPsrHits = 31: U16,
    CountSsrHits = 32: U16,
    CountSsrAllCall = 33: U16,
    CountSsrRollCall = 34: U16,
    CountAllCallSsr = 35: U16,
    CountRollCallSsr = 36: U16,
    CountTotalMessages = 37: U16,
    CountSoleModeSAllCall = 38: U16,
    CountSoleModeSRollCall = 39: U16,
    CountModeSAllCallSsr = 40: U16,
    CountModeSRollCallSsr = 41: U16,
    CountModeSAllCallPsr = 42: U16,
    CountModeSRollCallPsr = 43: U16,
    CountModeSAllCallSsrPsr = 44: U16,
    CountModeSRollCallSsrPsr = 45: U16,
    CountOther = 46: U16,

    // Polar window, data filter, sensor position
    PolarWindowRangeStart = 50: U16,
    PolarWindowRangeEnd = 51: U16,
    PolarWindowAziStart = 52: U16,
    PolarWindowAziEnd = 53: U16,
    FilterWeather = 54: U8,
    FilterJamming = 55: U8,
    FilterPsr = 56: U8,
    FilterSsrModeS = 57: U8,
    FilterSsrModeSPsr = 58: U8,
    FilterEnhancedSurveillance = 59: U8,
    FilterPsrEnhancedSurveillance = 60: U8,
    FilterPsrEnhancedSurveillanceNoSsr = 61: U8,
    FilterPsrEnhancedSurveillanceSsrPsr = 62: U8,
    FilterOther = 63: U8,
    PosHeight = 64: I16,
    PosLatitude = 65: I32,
    PosLongitude = 66: I32,
    CollimationErrRange = 67: I8,
    CollimationErrAzi = 68: I8,

    // Target reports (CAT001, CAT048, CAT159)
    TargetReport = 100: U8,
    TargetReportType = 101: U8,
    TargetReportExt = 102: U8,
    TargetReportExt2 = 103: U8,
    TargetReportExt3 = 104: U8,
    MeasuredPosRange = 105: U16,
    MeasuredPosBearing = 106: U16,
    Mode3 = 107: U16,
    FlightLevel = 108: I16,
    FlightLevelFlags = 109: U8,
    SsrPlotRunlength = 110: U8,
    SsrRepliesReceived = 111: U8,
    SsrReplyAmplitude = 112: I8,
    PsrPlotRunlength = 113: U8,
    PsrPlotAmplitude = 114: I8,
    PsrSsrDiffRange = 115: I8,
    PsrSsrDiffAzi = 116: I8,
    AircraftAddress = 117: U32,
    AircraftId = 118: Text,
    ModeSMbData = 119: Data,
    TrackNumber = 120: U16,
    CalcPosX = 121: I16,
    CalcPosY = 122: I16,
    CalcSpeed = 123: U16,
    CalcHeading = 124: U16,
    TrackStatus = 125: U8,
    TrackStatusExt = 126: U8,
    TrackStatusExt2 = 127: U8,
    TrackStatusExt3 = 128: U8,
    TrackStatusExt4 = 129: U8,
    TrackStatusExt5 = 130: U8,
    TrackQualSigmaX = 131: U8,
    TrackQualSigmaY = 132: U8,
    TrackQualSigmaV = 133: U8,
    TrackQualSigmaH = 134: U8,
    TrackQualCov = 135: I16,
    Mode3Conf = 136: U16,
    ModeCConf = 137: U32,
    Measured3dHeight = 138: I16,
    CalcDopplerSpeedValid = 139: U8,
    CalcDopplerSpeed = 140: I16,
    RawDopplerRep = 141: U8,
    RawDopplerSpeed = 142: I16,
    RawDopplerAmbiguity = 143: U16,
    RawDopplerTransFreq = 144: U16,
    DcRawDopplerSpeed = 145: I16,
    CommsStatus = 146: U16,
    AcasResAdvReport = 147: Data,
    Mode1 = 148: U8,
    Mode1Conf = 149: U8,
    Mode2 = 150: U16,
    Mode2Conf = 151: U16,
    Mode1Ext = 152: U16,
    ExtendedRangeReport = 153: U32,
    PlotCharacteristics = 154: Data,
    MeasuredDoppler = 155: I8,
    TrackQuality = 156: Data,
    XPulse = 157: U8,
    MsgAmplitude = 158: I8,

    // Mode 5 (CAT048 RE, CAT021 RE, CAT062)
    MesMode5Summary = 170: U8,
    MesMode5Pin = 171: U16,
    MesMode5Nat = 172: U16,
    MesMode5Fom = 173: U8,
    MesMode5PosLatitude = 174: I32,
    MesMode5PosLongitude = 175: I32,
    MesMode5Altitude = 176: I16,
    MesMode5TimeOffset = 177: I8,
    MesMode1 = 178: U16,
    MesMode2 = 179: U16,
    MesXPulse = 180: U8,
    MesMerit = 181: U8,

    // Surface / ground targets (CAT010, CAT020)
    TargetSizeLength = 200: U8,
    TargetSizeOrient = 201: U8,
    TargetSizeWidth = 202: U8,
    Presence = 203: Data,
    PreprogMsg = 204: U8,
    VehicleFleet = 205: U8,
    Sti = 206: U8,
    CalcVelocityX = 207: I16,
    CalcVelocityY = 208: I16,
    CalcAccelX = 209: I8,
    CalcAccelY = 210: I8,
    CalcPosXHighPrec = 211: I32,
    CalcPosYHighPrec = 212: I32,
    PosAccuracyDopX = 213: U16,
    PosAccuracyDopY = 214: U16,
    PosAccuracyDopXy = 215: U16,
    PosAccuracySdX = 216: U16,
    PosAccuracySdY = 217: U16,
    PosAccuracySdXy = 218: I16,
    PosAccuracySdGh = 219: U16,
    ContributingReceivers = 220: Data,

    // ADS-B (CAT021)
    TargetReportOld = 250: U16,
    AdsMerit = 251: U16,
    AdsLink = 252: U8,
    TimePosition = 253: U32,
    TimeVelocity = 254: U32,
    MsgTimePosition = 255: U32,
    MsgTimePositionHighPrec = 256: U32,
    MsgTimeVelocity = 257: U32,
    MsgTimeVelocityHighPrec = 258: U32,
    PosLatitudeHighPrec = 259: I32,
    PosLongitudeHighPrec = 260: I32,
    AirSpeed = 261: U16,
    TrueAirSpeed = 262: U16,
    GeometricHeight = 263: I16,
    QualInd = 264: U8,
    QualIndExt = 265: U8,
    QualIndExt2 = 266: U8,
    QualIndExt3 = 267: U8,
    MopsVersion = 268: U8,
    RollAngle = 269: I16,
    MagneticHeading = 270: U16,
    TargetStatus = 271: U8,
    BarometricVerticalRate = 272: I16,
    GeometricVerticalRate = 273: I16,
    AirborneGroundSpeed = 274: U16,
    AirborneTrackAngle = 275: U16,
    TrackAngleRate = 276: I16,
    EmitterCategory = 277: U8,
    WindSpeed = 278: U16,
    WindDirection = 279: U16,
    Temperature = 280: I16,
    Turbulence = 281: U8,
    SelectedAltitude = 282: U16,
    FinalStateSelectedAltitude = 283: U16,
    TrajIntentStatus = 284: U8,
    TrajIntentData = 285: Data,
    ServiceManagement = 286: U8,
    AircraftOpStatus = 287: U8,
    SurfaceCapabilities = 288: U8,
    SurfaceCapabilitiesExt = 289: U8,
    ReceiverId = 290: U8,
    VelocityUncertainty = 291: U8,
    TimeAccuracy = 292: U8,
    BarometricPressure = 293: U16,
    SelectedHeading = 294: U16,
    NavigationMode = 295: U8,
    GpsOffset = 296: U8,
    SurfaceGroundSpeed = 297: U16,
    SurfaceTrackAngle = 298: U8,
    AircraftStatus = 299: U8,
    AircraftStatusExt = 300: U8,
    TrueHeading = 301: U16,
    IndicatedAirSpeed = 302: U16,
    MachNumber = 303: U16,
    DerivedLatitude = 304: I32,
    DerivedLongitude = 305: I32,

    // Data ages (CAT021 I021/295, CAT062 I062/290 and I062/295)
    AircraftOpStatusAge = 320: U8,
    TargetReportAge = 321: U8,
    Mode3Age = 322: U8,
    QualIndAge = 323: U8,
    TrajIntentAge = 324: U8,
    MsgAmplitudeAge = 325: U8,
    GeometricHeightAge = 326: U8,
    FlightLevelAge = 327: U8,
    SelectedAltitudeAge = 328: U8,
    FinalStateSelectedAltitudeAge = 329: U8,
    AirSpeedAge = 330: U8,
    TrueAirSpeedAge = 331: U8,
    MagneticHeadingAge = 332: U8,
    BarometricVerticalRateAge = 333: U8,
    GeometricVerticalRateAge = 334: U8,
    AirborneAge = 335: U8,
    TrackAngleRateAge = 336: U8,
    AircraftIdAge = 337: U8,
    TargetStatusAge = 338: U8,
    MetInfoAge = 339: U8,
    RollAngleAge = 340: U8,
    AcasResAdvReportAge = 341: U8,
    SurfaceCapabilitiesAge = 342: U8,
    TrackAge = 343: U8,
    PsrAge = 344: U8,
    SsrAge = 345: U8,
    ModeSAge = 346: U8,
    AdsCAge = 347: U16,
    EsAge = 348: U8,
    VdlAge = 349: U8,
    UatAge = 350: U8,
    LoopAge = 351: U8,
    MultilatAge = 352: U8,
    MeasuredFlightLevelAge = 353: U8,
    Mode1Age = 354: U8,
    Mode2Age = 355: U8,
    Mode4Age = 356: U8,
    Mode5Age = 357: U8,
    CommsStatusAge = 358: U8,
    AdsbStatusAge = 359: U8,
    TrackAngleAge = 360: U8,
    GroundSpeedAge = 361: U8,
    VelocityUncertaintyAge = 362: U8,
    EmitterCategoryAge = 363: U8,
    PosAge = 364: U8,
    PosUncertaintyAge = 365: U8,
    ModeSMbDataAge = 366: U8,
    MachNumberAge = 367: U8,
    BarometricPressureAge = 368: U8,

    // System tracks (CAT062)
    ModeOfMovement = 401: U8,
    MeasuredFlightLevel = 402: I16,
    CalcGeometricAltitude = 403: I16,
    CalcBarometricAltitude = 404: I16,
    CalcBarometricAltitudeQnh = 405: U8,
    CalcRateOfClimb = 406: I16,
    ComposedTrackNumber = 407: Data,
    PosAccuracySdLat = 408: U16,
    PosAccuracySdLon = 409: U16,
    PosAccuracySdGeomAlt = 410: U8,
    PosAccuracySdBaroAlt = 411: U8,
    VelAccuracySdX = 412: U8,
    VelAccuracySdY = 413: U8,
    AccAccuracySdX = 414: U8,
    AccAccuracySdY = 415: U8,
    VelAccuracySdVr = 416: U8,
    SensorSac = 417: U8,
    SensorSic = 418: U8,
    MeasuredModeC = 419: U16,
    MeasuredMode3 = 420: U16,
    MeasuredReportType = 421: U8,
    CalcVelocityRelX = 422: I16,
    CalcVelocityRelY = 423: I16,
    FlightPlanSac = 430: U8,
    FlightPlanSic = 431: U8,
    FlightPlanCallsign = 432: Text,
    FlightPlanId = 433: U32,
    FlightPlanCategory = 434: U8,
    FlightPlanAircraftType = 435: Text,
    FlightPlanWakeCategory = 436: U8,
    FlightPlanDepAirport = 437: Text,
    FlightPlanDestAirport = 438: Text,
    FlightPlanRunway = 439: Text,
    FlightPlanFlightLevel = 440: I16,
    FlightPlanControlPos = 441: U16,
    FlightPlanTimes = 442: Data,
    FlightPlanStand = 443: Text,
    FlightPlanStandStatus = 444: U8,
    FlightPlanSid = 445: Text,
    FlightPlanStar = 446: Text,
    FlightPlanPreEmergMode3 = 447: U16,
    FlightPlanPreEmergCallsign = 448: Text,

    // Safety nets (CAT004)
    SdpsIdentifier = 500: Data,
    SdpsControllerIdentifier = 501: Data,
    AlertIdentifier = 502: U16,
    AlertStatus = 503: U8,
    SafetyNetStatus = 504: U8,
    SafetyNetStatusExt = 505: U8,
    SnConflictFlags = 506: U8,
    SnConflictFlagsExt = 507: U8,
    SnConflictClass = 508: U8,
    SnConflictProbability = 509: U8,
    SnConflictDuration = 510: U32,
    SnTimeToConflict = 511: U32,
    SnTimeToCpa = 512: U32,
    SnCurrentHorizSep = 513: U32,
    SnMinHorizSep = 514: U16,
    SnCurrentVertSep = 515: U16,
    SnMinVertSep = 516: U16,
    VerticalDeviation = 517: I16,
    LongitudinalDeviation = 518: I16,
    TransversalDeviation = 519: I32,
    AreaName = 520: Text,
    CrossingAreaName = 521: Text,
    RunwayDesignator1 = 522: Text,
    RunwayDesignator2 = 523: Text,
    StopBarDesignator = 524: Text,
    GateDesignator = 525: Text,
    SnPredPosLat1 = 530: I32,
    SnPredPosLong1 = 531: I32,
    SnPredPosAlt1 = 532: I16,
    SnPredPosX1 = 533: I32,
    SnPredPosY1 = 534: I32,
    SnTimeToThresh1 = 535: U32,
    SnDistToThresh1 = 536: U16,
    SnAcCharacteristics1 = 537: U8,
    SnAcCharacteristicsExt1 = 538: U8,
    SnModeSId1 = 539: Text,
    SnFlightPlanNum1 = 540: U32,
    SnClearedLevel1 = 541: I16,
    TrackNumber2 = 550: U16,
    AircraftId2 = 551: Text,
    Mode3Ac2 = 552: U16,
    SnPredPosLat2 = 553: I32,
    SnPredPosLong2 = 554: I32,
    SnPredPosAlt2 = 555: I16,
    SnPredPosX2 = 556: I32,
    SnPredPosY2 = 557: I32,
    SnTimeToThresh2 = 558: U32,
    SnDistToThresh2 = 559: U16,
    SnAcCharacteristics2 = 560: U8,
    SnAcCharacteristicsExt2 = 561: U8,
    SnModeSId2 = 562: Text,
    SnFlightPlanNum2 = 563: U32,
    SnClearedLevel2 = 564: I16,

    // Monoradar service messages (CAT008 weather)
    VectorQualifier = 600: U8,
    VectorQualifierExt = 601: U8,
    CartesianVectorData = 602: Data,
    PolarVectorData = 603: Data,
    ContourIdentifier = 604: U16,
    ContourData = 605: Data,
    ProcStatus = 606: U32,
    StationConfigStatus = 607: U8,
    TotalPictureItems = 608: U16,
    WeatherVectorData = 609: Data,

    // Multilateration / ADS-B network management (CAT017, CAT019, CAT020)
    DestSac = 650: U8,
    DestSic = 651: U8,
    ClusterNodeList = 652: Data,
    DuplicateAddressRefNum = 653: U16,
    TransponderCapability = 654: U8,
    ModeSList = 655: Data,
    ClusterState = 656: U8,

    // Project 466 special purpose field
    SpfP466SysTrack = 4661: U16,
    SpfP466Identity = 4662: U8,
    SpfP466Quality = 4663: U8,
    SpfP466M6 = 4664: U8,
    SpfP466Classification = 4665: U8,
    SpfP466Altitude = 4666: I16,
    SpfP466Latitude = 4667: I32,
    SpfP466Longitude = 4668: I32,
    SpfP466Speed = 4669: U16,
    SpfP466Heading = 4670: U16,
    SpfP466Callsign = 4671: Text,
    SpfP466PlatType = 4672: Text,
}

impl Property {
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Tags decoded from the project 466 special purpose field.
    pub fn is_spf_p466(self) -> bool {
        (4661..=4672).contains(&self.code())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for &p in Property::ALL {
            assert!(seen.insert(p.code()), "duplicate code {}", p.code());
            assert_eq!(Property::from_code(p.code()), Some(p));
        }
        assert_eq!(Property::from_code(0), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Property::TrackNumber.kind(), PropertyKind::U16);
        assert_eq!(Property::AircraftId.kind(), PropertyKind::Text);
        assert_eq!(Property::FlightLevel.kind(), PropertyKind::I16);
        assert!(Property::CalcPosX.kind().is_signed());
        assert!(!Property::Spf.kind().is_integer());
    }

    #[test]
    fn test_value_from_raw_checks_range() {
        assert_eq!(Value::from_raw(PropertyKind::U8, 255), Some(Value::U8(255)));
        assert_eq!(Value::from_raw(PropertyKind::U8, 256), None);
        assert_eq!(Value::from_raw(PropertyKind::I8, -128), Some(Value::I8(-128)));
        assert_eq!(Value::from_raw(PropertyKind::U16, -1), None);
        assert_eq!(Value::from_raw(PropertyKind::Text, 1), None);
    }

    #[test]
    fn test_spf_range() {
        assert!(Property::SpfP466Callsign.is_spf_p466());
        assert!(!Property::Spf.is_spf_p466());
        assert_eq!(Property::SpfP466SysTrack.name(), "SpfP466SysTrack");
    }
}
