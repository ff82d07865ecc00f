# [repr (transparent)] # [derive (Copy , Clone , Eq , PartialEq , Ord , PartialOrd , Hash)] pub struct Error { ord : i32 , } impl Error { pub const OK : Error = Error { ord : 0 } ; pub const FAILED : Error = Error { ord : 1 } ; pub const ERR_UNAVAILABLE : Error = Error { ord : 2 } ; pub const ERR_INVALID_PARAMETER : Error = Error { ord : 31 } ; pub const ERR_ALREADY_EXISTS : Error = Error { ord : 32 } ; } impl std :: fmt :: Debug for Error { fn fmt (& self , f : & mut std :: fmt :: Formatter < '_ >) -> std :: fmt :: Result { let enumerator = match self . ord { 0 => "OK" , 1 => "FAILED" , 2 => "ERR_UNAVAILABLE" , 31 => "ERR_INVALID_PARAMETER" , 32 => "ERR_ALREADY_EXISTS" , _ => return f . debug_struct ("Error") . field ("ord" , & self . ord) . finish () , } ; f . write_str (enumerator) } } impl crate :: obj :: EngineEnum for Error { fn try_from_ord (ord : i32) -> Option < Self > { match ord { 0 | 1 | 2 | 31 | 32 => Some (Self { ord }) , _ => None , } } fn ord (self) -> i32 { self . ord } fn as_str (& self) -> & 'static str { match self . ord { 0 => "OK" , 1 => "FAILED" , 2 => "ERR_UNAVAILABLE" , 31 => "ERR_INVALID_PARAMETER" , 32 => "ERR_ALREADY_EXISTS" , _ => "" , } } } impl crate :: meta :: GodotConvert for Error { type Via = i64 ; } impl crate :: meta :: ToGodot for Error { fn to_godot (& self) -> i64 { i64 :: from (self . ord) } } impl crate :: meta :: FromGodot for Error { fn try_from_godot (via : i64) -> Result < Self , crate :: meta :: ConvertError > { i32 :: try_from (via) . ok () . and_then (< Self as crate :: obj :: EngineEnum > :: try_from_ord) . ok_or_else (|| { crate :: meta :: ConvertError :: with_kind_value (crate :: meta :: ErrorKind :: BadEnumOrdinal { enum_name : "Error" } , via ,) }) } }